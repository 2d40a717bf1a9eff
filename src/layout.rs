//! The duplicata form laid out on a [`Surface`].
//!
//! The upper part of the form flows: every block starts below the bottom edge
//! returned by the block before it, so long names or addresses push the rest
//! down.  The tear-off line, the stub label, the stub table and the stub
//! signature lines are anchored to fixed page coordinates instead.  Content
//! that flows past the tear-off line is not moved or truncated; it overlaps
//! the stub, and [`LayoutReport::overflows_stub`] reports it.

use log::{debug, warn};

use crate::error::Error;
use crate::format::{format_currency, format_currency_bare, format_date, parse_amount};
use crate::model::{HorizontalAlignment, InvoiceRecord, Party};
use crate::surface::{
    Cell, CellPadding, DashPattern, HeadStyle, Surface, TableSpec, TableTheme, TextStyle,
    VerticalAlignment, HEADER_FILL,
};
use crate::words::amount_in_words;

/// Left and right page margin.
pub const MARGIN: f64 = 10.0;
/// Baseline of the title.
pub const TITLE_Y: f64 = 20.0;
/// Top of the summary table.
pub const SUMMARY_START_Y: f64 = 25.0;
/// Width reserved for the summary table, counted back from the content edge.
pub const SUMMARY_WIDTH: f64 = 50.0;
/// Anchored tear-off line.
pub const TEAR_OFF_Y: f64 = 230.0;
/// Anchored baseline of the stub label.
pub const STUB_LABEL_Y: f64 = 235.0;
/// Anchored top of the stub table.
pub const STUB_TABLE_Y: f64 = 238.0;
/// Anchored baseline of the stub signature lines.
pub const STUB_SIGNATURE_Y: f64 = 280.0;
/// Height of the acceptance box.
pub const ACCEPTANCE_BOX_HEIGHT: f64 = 25.0;

const TITLE: &str = "DUPLICATA DE VENDA MERCANTIL";
const STUB_LABEL: &str = "CANHOTO DA DUPLICATA";
const CREDITOR_HEADING: &str = "CREDOR (EMITENTE)";
const DEBTOR_HEADING: &str = "SACADO (DEVEDOR)";

const GAP_AFTER_SUMMARY: f64 = 5.0;
const GAP_AFTER_CREDITOR: f64 = 2.0;
const GAP_AFTER_INVOICE: f64 = 2.0;
const OBLIGATION_OFFSET: f64 = 15.0;
const ACCEPTANCE_OFFSET: f64 = 30.0;
const GAP_AFTER_STUB_TABLE: f64 = 5.0;
/// Width taken off the content width when wrapping the stub receipt text.
const STUB_TEXT_INSET: f64 = 85.0;

const TITLE_FONT_SIZE: u8 = 16;
const TABLE_FONT_SIZE: u8 = 9;
const HEADING_FONT_SIZE: u8 = 10;
const BODY_FONT_SIZE: u8 = 10;
const STUB_FONT_SIZE: u8 = 8;
const GRID_PADDING: f64 = 1.5;
const PLAIN_PADDING: f64 = 1.0;

/// Positions reached by the flowing part of the form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutReport {
    /// Bottom of the summary table.
    pub summary_bottom: f64,
    /// Bottom of the creditor block.
    pub creditor_bottom: f64,
    /// Bottom of the invoice row.
    pub invoice_bottom: f64,
    /// Bottom of the debtor block.
    pub debtor_bottom: f64,
    /// Bottom of the obligation text.
    pub obligation_bottom: f64,
    /// Bottom of the acceptance box.
    pub acceptance_bottom: f64,
    /// Bottom of the stub table.
    pub stub_table_bottom: f64,
    /// Whether the flowing content reached the tear-off line.
    pub overflows_stub: bool,
}

/// Draws the whole form for `record` without saving the page.
pub fn render<S>(record: &InvoiceRecord, surface: &mut S) -> Result<LayoutReport, Error>
where
    S: Surface + ?Sized,
{
    let page_width = surface.page_width();
    let content_width = page_width - MARGIN * 2.0;
    let currency = format_currency(&record.value);

    surface.draw_text(
        TITLE,
        page_width / 2.0,
        TITLE_Y,
        &TextStyle::new(TITLE_FONT_SIZE)
            .bold()
            .with_align(HorizontalAlignment::Center),
    )?;

    let summary_bottom = surface.draw_table(&summary_table(record, content_width))?;

    let creditor_bottom = surface.draw_table(&party_block(
        CREDITOR_HEADING,
        &record.creditor,
        None,
        summary_bottom + GAP_AFTER_SUMMARY,
    ))?;

    let invoice_bottom = surface.draw_table(&invoice_row(
        record,
        &currency,
        creditor_bottom + GAP_AFTER_CREDITOR,
    ))?;

    let debtor_bottom = surface.draw_table(&party_block(
        DEBTOR_HEADING,
        &record.debtor,
        Some(record.payment_place.as_str()),
        invoice_bottom + GAP_AFTER_INVOICE,
    ))?;

    let body_style = TextStyle::new(BODY_FONT_SIZE);
    let obligation = obligation_text(record, &currency);
    let lines = surface.wrap_text(&obligation, content_width, &body_style);
    let obligation_bottom = draw_lines(
        surface,
        &lines,
        MARGIN,
        debtor_bottom + OBLIGATION_OFFSET,
        &body_style,
    )?;

    let acceptance_top = debtor_bottom + ACCEPTANCE_OFFSET;
    draw_acceptance_box(surface, acceptance_top, content_width, &body_style)?;
    let acceptance_bottom = acceptance_top + ACCEPTANCE_BOX_HEIGHT;

    let overflows_stub = obligation_bottom.max(acceptance_bottom) > TEAR_OFF_Y;
    if overflows_stub {
        warn!(
            "Duplicata {:?}: content reaches y={:.1}, past the tear-off line at y={}; the stub will overlap it",
            record.number,
            obligation_bottom.max(acceptance_bottom),
            TEAR_OFF_Y
        );
    }

    surface.set_dash_pattern(DashPattern::new(vec![2.0, 1.0], 0.0))?;
    surface.draw_line(MARGIN, TEAR_OFF_Y, page_width - MARGIN, TEAR_OFF_Y)?;
    surface.set_dash_pattern(None)?;

    surface.draw_text(
        STUB_LABEL,
        MARGIN,
        STUB_LABEL_Y,
        &TextStyle::new(BODY_FONT_SIZE).bold(),
    )?;

    let stub_style = TextStyle::new(STUB_FONT_SIZE);
    let stub_lines = surface.wrap_text(
        &stub_receipt_text(&record.creditor),
        content_width - STUB_TEXT_INSET,
        &stub_style,
    );

    let stub_table_bottom = surface.draw_table(&stub_table(record, &currency))?;
    draw_lines(
        surface,
        &stub_lines,
        MARGIN,
        stub_table_bottom + GAP_AFTER_STUB_TABLE,
        &stub_style,
    )?;

    draw_stub_signatures(surface, content_width, &stub_style)?;

    let report = LayoutReport {
        summary_bottom,
        creditor_bottom,
        invoice_bottom,
        debtor_bottom,
        obligation_bottom,
        acceptance_bottom,
        stub_table_bottom,
        overflows_stub,
    };
    debug!("Laid out duplicata {:?}: {:?}", record.number, report);
    Ok(report)
}

/// Draws the form for `record` and saves the page under its file name.
///
/// Returns the file name.  The record is not validated; empty fields render
/// as blanks and an unparseable value as zero.
pub fn generate<S>(record: &InvoiceRecord, surface: &mut S) -> Result<String, Error>
where
    S: Surface + ?Sized,
{
    render(record, surface)?;
    let file_name = record.output_file_name();
    surface.save(&file_name)?;
    Ok(file_name)
}

fn summary_table(record: &InvoiceRecord, content_width: f64) -> TableSpec {
    TableSpec::new(TableTheme::Grid, SUMMARY_START_Y)
        .with_margins(content_width - SUMMARY_WIDTH, MARGIN)
        .with_font_size(TABLE_FONT_SIZE)
        .with_padding(CellPadding::uniform(GRID_PADDING))
        .with_head_style(HeadStyle {
            fill: Some(HEADER_FILL),
            ..HeadStyle::default()
        })
        .with_row(["Nº da Duplicata".to_owned(), record.number.clone()])
        .with_row(["Vencimento".to_owned(), format_date(&record.due_date)])
        .with_row(["Valor R$".to_owned(), format_currency_bare(&record.value)])
}

fn party_block(
    heading: &str,
    party: &Party,
    payment_place: Option<&str>,
    start_y: f64,
) -> TableSpec {
    let mut table = TableSpec::new(TableTheme::Plain, start_y)
        .with_margins(MARGIN, MARGIN)
        .with_font_size(TABLE_FONT_SIZE)
        .with_padding(CellPadding::uniform(PLAIN_PADDING))
        .with_head(
            [heading],
            HeadStyle {
                font_size: Some(HEADING_FONT_SIZE),
                bold: true,
                padding: Some(CellPadding::new(2.0, PLAIN_PADDING, 1.0, 0.0)),
                fill: None,
            },
        )
        .with_row([format!("Nome/Razão Social: {}", party.name)])
        .with_row([format!("CNPJ/CPF: {}", party.doc)])
        .with_row([format!("Endereço: {}", party.address)])
        .with_row([locality_line(party)]);

    if let Some(place) = payment_place {
        table = table.with_row([format!("Praça de Pagamento: {}", place)]);
    }
    table
}

fn locality_line(party: &Party) -> String {
    format!(
        "Município: {} UF: {} CEP: {}",
        party.city, party.state, party.zip
    )
}

fn invoice_row(record: &InvoiceRecord, currency: &str, start_y: f64) -> TableSpec {
    TableSpec::new(TableTheme::Grid, start_y)
        .with_margins(MARGIN, MARGIN)
        .with_font_size(TABLE_FONT_SIZE)
        .with_padding(CellPadding::uniform(GRID_PADDING))
        .with_row([
            Cell::new(format!("Fatura Nº: {}", record.invoice_number))
                .aligned(HorizontalAlignment::Left),
            Cell::new(format!(
                "Data de Emissão: {}",
                format_date(&record.issue_date)
            ))
            .aligned(HorizontalAlignment::Center),
            Cell::new(format!("Valor Total da Fatura: {}", currency))
                .aligned(HorizontalAlignment::Right),
        ])
}

fn obligation_text(record: &InvoiceRecord, currency: &str) -> String {
    format!(
        "Pagar(ão) por esta duplicata de venda, na praça e vencimento acima indicados, a {} ou à sua ordem, a importância de {} ({}), correspondente à Fatura Nº {}.",
        record.creditor.name,
        currency,
        amount_in_words(parse_amount(&record.value)),
        record.invoice_number
    )
}

fn stub_receipt_text(creditor: &Party) -> String {
    format!(
        "Recebi(emos) de {} os produtos/mercadorias constantes da Nota Fiscal - Fatura indicada ao lado, que constitui o objeto da presente Duplicata, pela qual me dou por achado e ciente, e que assinada confirmo o seu recebimento.",
        creditor.name
    )
}

fn stub_table(record: &InvoiceRecord, currency: &str) -> TableSpec {
    TableSpec::new(TableTheme::Grid, STUB_TABLE_Y)
        .with_margins(MARGIN, MARGIN)
        .with_font_size(STUB_FONT_SIZE)
        .with_padding(CellPadding::uniform(GRID_PADDING))
        .with_valign(VerticalAlignment::Middle)
        .with_row([
            format!("Nº Duplicata\n{}", record.number),
            format!("Valor\n{}", currency),
            format!("Vencimento\n{}", format_date(&record.due_date)),
            format!("Emitente\n{}", record.creditor.name),
        ])
}

/// Draws pre-wrapped lines from baseline `y` and returns the baseline after the last one.
fn draw_lines<S>(
    surface: &mut S,
    lines: &[String],
    x: f64,
    y: f64,
    style: &TextStyle,
) -> Result<f64, Error>
where
    S: Surface + ?Sized,
{
    let line_height = style.line_height();
    for (index, line) in lines.iter().enumerate() {
        surface.draw_text(line, x, y + index as f64 * line_height, style)?;
    }
    Ok(y + lines.len() as f64 * line_height)
}

fn draw_acceptance_box<S>(
    surface: &mut S,
    top: f64,
    content_width: f64,
    style: &TextStyle,
) -> Result<(), Error>
where
    S: Surface + ?Sized,
{
    surface.draw_rect(MARGIN, top, content_width, ACCEPTANCE_BOX_HEIGHT)?;

    let date_y = top + 5.0;
    surface.draw_text("Data do Aceite:", MARGIN + 2.0, date_y, style)?;
    surface.draw_line(MARGIN + 30.0, date_y, MARGIN + 80.0, date_y)?;

    let signature_y = top + 20.0;
    surface.draw_text("Assinatura do Sacado:", MARGIN + 2.0, signature_y, style)?;
    surface.draw_line(
        MARGIN + 40.0,
        signature_y,
        MARGIN + content_width - 2.0,
        signature_y,
    )?;
    Ok(())
}

fn draw_stub_signatures<S>(
    surface: &mut S,
    content_width: f64,
    style: &TextStyle,
) -> Result<(), Error>
where
    S: Surface + ?Sized,
{
    let y = STUB_SIGNATURE_Y;
    // (label, label x, line start, line end)
    let fields = [
        ("Data:", MARGIN, MARGIN + 10.0, MARGIN + 50.0),
        ("Assinatura:", MARGIN + 60.0, MARGIN + 75.0, MARGIN + 125.0),
        (
            "Nome Legível/RG:",
            MARGIN + 135.0,
            MARGIN + 160.0,
            MARGIN + content_width,
        ),
    ];
    for (label, label_x, line_start, line_end) in fields {
        surface.draw_text(label, label_x, y, style)?;
        surface.draw_line(line_start, y, line_end, y)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawOp, RecordingSurface};

    #[test]
    fn obligation_spells_out_the_amount() {
        let record = InvoiceRecord {
            creditor: Party::new("ACME LTDA"),
            invoice_number: "123".into(),
            value: "999,90".into(),
            ..InvoiceRecord::default()
        };
        let text = obligation_text(&record, &format_currency(&record.value));
        assert!(text.contains("a ACME LTDA ou à sua ordem"));
        assert!(text.contains(
            "R$ 999,90 (novecentos e noventa e nove reais e noventa centavos)"
        ));
        assert!(text.ends_with("Fatura Nº 123."));
    }

    #[test]
    fn summary_table_sits_at_the_right_edge() {
        let table = summary_table(&InvoiceRecord::default(), 190.0);
        assert_eq!(table.margin_left, 140.0);
        assert_eq!(table.margin_right, MARGIN);
        assert!(table.head.is_none());
        assert_eq!(table.body.len(), 3);
    }

    #[test]
    fn debtor_block_adds_payment_place() {
        let creditor = party_block(CREDITOR_HEADING, &Party::default(), None, 0.0);
        let debtor = party_block(DEBTOR_HEADING, &Party::default(), Some("São Paulo/SP"), 0.0);
        assert_eq!(creditor.body.len(), 4);
        assert_eq!(debtor.body.len(), 5);
        assert_eq!(
            debtor.body[4][0].content,
            "Praça de Pagamento: São Paulo/SP"
        );
    }

    #[test]
    fn empty_record_still_renders_every_landmark() {
        let mut surface = RecordingSurface::default();
        let file_name = generate(&InvoiceRecord::default(), &mut surface).unwrap();

        assert_eq!(file_name, "duplicata-sem-numero.pdf");
        let tables = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Table { .. }))
            .count();
        assert_eq!(tables, 5);
        let stub_cells: Vec<&str> = surface
            .ops()
            .iter()
            .rev()
            .find_map(|op| match op {
                DrawOp::Table { spec, .. } => Some(spec.body_texts().collect()),
                _ => None,
            })
            .unwrap();
        assert_eq!(stub_cells[1], "Valor\nR$ 0,00");
        assert!(matches!(surface.ops().last(), Some(DrawOp::Save { .. })));
    }

    #[test]
    fn reports_overflow_past_the_tear_off_line() {
        let record = InvoiceRecord {
            creditor: Party::new("X").with_address("rua ".repeat(1000)),
            ..InvoiceRecord::default()
        };
        let mut surface = RecordingSurface::default();
        let report = render(&record, &mut surface).unwrap();
        let regular = render(&InvoiceRecord::default(), &mut RecordingSurface::default()).unwrap();

        assert!(report.acceptance_bottom > TEAR_OFF_Y);
        assert!(report.overflows_stub);
        assert!(regular.acceptance_bottom < TEAR_OFF_Y);
        assert!(!regular.overflows_stub);
        assert_eq!(report.stub_table_bottom, regular.stub_table_bottom);
    }
}
