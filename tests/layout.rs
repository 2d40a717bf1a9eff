use duplicata::layout::{
    self, ACCEPTANCE_BOX_HEIGHT, STUB_LABEL_Y, STUB_SIGNATURE_Y, STUB_TABLE_Y, SUMMARY_START_Y,
    TEAR_OFF_Y, TITLE_Y,
};
use duplicata::surface::recording::{DrawOp, RecordingSurface};
use duplicata::surface::TableTheme;
use duplicata::{InvoiceRecord, Party};

fn sample_record() -> InvoiceRecord {
    InvoiceRecord {
        creditor: Party::new("ACME LTDA")
            .with_doc("12.345.678/0001-99")
            .with_address("Rua das Flores, 100, Centro")
            .with_locality("São Paulo", "SP", "01000-000"),
        debtor: Party::new("JOAO SILVA")
            .with_doc("123.456.789-00")
            .with_address("Av. Brasil, 2000")
            .with_locality("Campinas", "SP", "13000-000"),
        number: "55".into(),
        invoice_number: "NF-0099".into(),
        issue_date: "2024-12-01".into(),
        due_date: "2024-12-31".into(),
        value: "999,90".into(),
        payment_place: "São Paulo/SP".into(),
    }
}

fn record_ops(record: &InvoiceRecord) -> Vec<DrawOp> {
    let mut surface = RecordingSurface::default();
    layout::generate(record, &mut surface).expect("layout should succeed");
    surface.into_ops()
}

fn tables(ops: &[DrawOp]) -> Vec<(Vec<&str>, f64, f64)> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Table { spec, final_y } => {
                Some((spec.body_texts().collect(), spec.start_y, *final_y))
            }
            _ => None,
        })
        .collect()
}

fn text_at(ops: &[DrawOp], needle: &str) -> Option<(usize, f64)> {
    ops.iter().enumerate().find_map(|(index, op)| match op {
        DrawOp::Text { text, y, .. } if text.contains(needle) => Some((index, *y)),
        _ => None,
    })
}

#[test]
fn emits_the_form_in_order() {
    let ops = record_ops(&sample_record());

    match &ops[0] {
        DrawOp::Text { text, y, style, .. } => {
            assert_eq!(text, "DUPLICATA DE VENDA MERCANTIL");
            assert_eq!(*y, TITLE_Y);
            assert!(style.bold);
        }
        other => panic!("expected the title first, got {:?}", other),
    }

    let tables = tables(&ops);
    assert_eq!(tables.len(), 5);

    let (summary, _, _) = &tables[0];
    assert_eq!(
        summary,
        &vec!["Nº da Duplicata", "55", "Vencimento", "31/12/2024", "Valor R$", "999,90"]
    );

    let (creditor, _, _) = &tables[1];
    assert!(creditor.contains(&"Nome/Razão Social: ACME LTDA"));
    assert!(creditor.contains(&"Município: São Paulo UF: SP CEP: 01000-000"));

    let (invoice, _, _) = &tables[2];
    assert_eq!(
        invoice,
        &vec![
            "Fatura Nº: NF-0099",
            "Data de Emissão: 01/12/2024",
            "Valor Total da Fatura: R$ 999,90"
        ]
    );

    let (debtor, _, _) = &tables[3];
    assert_eq!(debtor.last(), Some(&"Praça de Pagamento: São Paulo/SP"));

    let (stub, start_y, _) = &tables[4];
    assert_eq!(*start_y, STUB_TABLE_Y);
    assert!(stub[0].contains("55"));
    assert_eq!(stub[1], "Valor\nR$ 999,90");
    assert_eq!(stub[3], "Emitente\nACME LTDA");

    let (obligation_index, _) = text_at(&ops, "Pagar(ão) por esta duplicata").unwrap();
    let (stub_label_index, _) = text_at(&ops, "CANHOTO DA DUPLICATA").unwrap();
    assert!(obligation_index < stub_label_index);
    let obligation: String = ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, y, .. } if *y < TEAR_OFF_Y => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ");
    assert!(obligation.contains("R$ 999,90"));

    assert_eq!(
        ops.last(),
        Some(&DrawOp::Save {
            file_name: "duplicata-55.pdf".to_owned()
        })
    );
}

#[test]
fn layout_is_deterministic() {
    let record = sample_record();
    assert_eq!(record_ops(&record), record_ops(&record));
}

#[test]
fn blocks_flow_below_each_other() {
    let ops = record_ops(&sample_record());
    let tables = tables(&ops);

    for pair in tables[..4].windows(2) {
        let (_, _, previous_bottom) = pair[0];
        let (_, next_start, _) = pair[1];
        assert!(next_start > previous_bottom);
    }

    let themes: Vec<TableTheme> = ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Table { spec, .. } => Some(spec.theme),
            _ => None,
        })
        .collect();
    assert_eq!(
        themes,
        vec![
            TableTheme::Grid,
            TableTheme::Plain,
            TableTheme::Grid,
            TableTheme::Plain,
            TableTheme::Grid
        ]
    );
}

#[test]
fn blocks_keep_their_fixed_gaps() {
    let mut record = sample_record();
    record.debtor.address = "Estrada Municipal do Pinhal, sem número, ".repeat(4);
    let ops = record_ops(&record);
    let tables = tables(&ops);
    let (_, summary_start, summary_bottom) = tables[0];
    let (_, creditor_start, creditor_bottom) = tables[1];
    let (_, invoice_start, invoice_bottom) = tables[2];
    let (_, debtor_start, debtor_bottom) = tables[3];
    let (_, _, stub_bottom) = tables[4];

    assert_eq!(summary_start, SUMMARY_START_Y);
    assert_eq!(creditor_start, summary_bottom + 5.0);
    assert_eq!(invoice_start, creditor_bottom + 2.0);
    assert_eq!(debtor_start, invoice_bottom + 2.0);

    let (_, obligation_y) = text_at(&ops, "Pagar(ão) por esta duplicata").unwrap();
    assert_eq!(obligation_y, debtor_bottom + 15.0);

    let boxes: Vec<&DrawOp> = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Rect { .. }))
        .collect();
    assert_eq!(
        boxes,
        vec![&DrawOp::Rect {
            x: 10.0,
            y: debtor_bottom + 30.0,
            width: 190.0,
            height: ACCEPTANCE_BOX_HEIGHT,
        }]
    );
    assert_eq!(ACCEPTANCE_BOX_HEIGHT, 25.0);

    let (_, receipt_y) = text_at(&ops, "Recebi(emos) de ACME LTDA").unwrap();
    assert_eq!(receipt_y, stub_bottom + 5.0);
}

#[test]
fn tear_off_line_is_dashed_and_anchored() {
    let ops = record_ops(&sample_record());

    let dashed: Vec<&DrawOp> = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::Line { dash: Some(_), .. }))
        .collect();
    assert_eq!(dashed.len(), 1);
    match dashed[0] {
        DrawOp::Line { x1, y1, x2, y2, dash } => {
            assert_eq!((*x1, *y1, *x2, *y2), (10.0, TEAR_OFF_Y, 200.0, TEAR_OFF_Y));
            assert_eq!(dash.as_ref().map(|d| d.lengths().to_vec()), Some(vec![2.0, 1.0]));
        }
        _ => unreachable!(),
    }
    assert!(ops.contains(&DrawOp::Dash(None)));

    let (_, label_y) = text_at(&ops, "CANHOTO DA DUPLICATA").unwrap();
    assert_eq!(label_y, STUB_LABEL_Y);
    let (_, signature_y) = text_at(&ops, "Nome Legível/RG:").unwrap();
    assert_eq!(signature_y, STUB_SIGNATURE_Y);
}

#[test]
fn longer_addresses_push_later_blocks_down() {
    let short = sample_record();
    let mut long = sample_record();
    long.creditor.address = "Rodovia dos Bandeirantes, km 23, Galpão 7, ".repeat(6);

    let short_ops = record_ops(&short);
    let long_ops = record_ops(&long);
    let short_tables = tables(&short_ops);
    let long_tables = tables(&long_ops);

    // Summary and creditor block start at the same place.
    assert_eq!(short_tables[0].2, long_tables[0].2);
    assert_eq!(short_tables[1].1, long_tables[1].1);

    // Everything after the creditor block moves down.
    assert!(long_tables[1].2 > short_tables[1].2);
    assert!(long_tables[2].1 > short_tables[2].1);
    assert!(long_tables[3].1 > short_tables[3].1);

    let short_accept = text_at(&short_ops, "Data do Aceite:").unwrap().1;
    let long_accept = text_at(&long_ops, "Data do Aceite:").unwrap().1;
    assert!(long_accept > short_accept);

    // The stub stays where it is.
    assert_eq!(short_tables[4].1, long_tables[4].1);
    assert_eq!(short_tables[4].2, long_tables[4].2);
}

#[test]
fn invalid_values_render_as_zero() {
    let mut record = sample_record();
    record.value = "abc".into();
    let ops = record_ops(&record);
    let tables = tables(&ops);

    assert_eq!(tables[0].0[5], "0,00");
    assert_eq!(tables[4].0[1], "Valor\nR$ 0,00");
}
