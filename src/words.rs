//! Brazilian Portuguese amounts in words ("valor por extenso").

use crate::format::to_cents;

const UNITS: [&str; 20] = [
    "zero",
    "um",
    "dois",
    "três",
    "quatro",
    "cinco",
    "seis",
    "sete",
    "oito",
    "nove",
    "dez",
    "onze",
    "doze",
    "treze",
    "quatorze",
    "quinze",
    "dezesseis",
    "dezessete",
    "dezoito",
    "dezenove",
];

const TENS: [&str; 10] = [
    "", "", "vinte", "trinta", "quarenta", "cinquenta", "sessenta", "setenta", "oitenta",
    "noventa",
];

const HUNDREDS: [&str; 10] = [
    "",
    "cento",
    "duzentos",
    "trezentos",
    "quatrocentos",
    "quinhentos",
    "seiscentos",
    "setecentos",
    "oitocentos",
    "novecentos",
];

/// Singular and plural names of each power of one thousand, starting at 10^3.
const SCALES: [(&str, &str); 12] = [
    ("mil", "mil"),
    ("milhão", "milhões"),
    ("bilhão", "bilhões"),
    ("trilhão", "trilhões"),
    ("quatrilhão", "quatrilhões"),
    ("quintilhão", "quintilhões"),
    ("sextilhão", "sextilhões"),
    ("septilhão", "septilhões"),
    ("octilhão", "octilhões"),
    ("nonilhão", "nonilhões"),
    ("decilhão", "decilhões"),
    ("undecilhão", "undecilhões"),
];

/// Spells out a number between 1 and 999.
fn group_in_words(value: u64) -> String {
    debug_assert!((1..1000).contains(&value));
    if value == 100 {
        return "cem".to_owned();
    }

    let hundreds = (value / 100) as usize;
    let rest = value % 100;
    let mut parts: Vec<&str> = Vec::with_capacity(3);

    if hundreds > 0 {
        parts.push(HUNDREDS[hundreds]);
    }
    if rest >= 20 {
        parts.push(TENS[(rest / 10) as usize]);
        if rest % 10 > 0 {
            parts.push(UNITS[(rest % 10) as usize]);
        }
    } else if rest > 0 {
        parts.push(UNITS[rest as usize]);
    }

    parts.join(" e ")
}

/// Spells out a whole number of any size supported by `u128`.
pub fn integer_in_words(value: u128) -> String {
    if value == 0 {
        return UNITS[0].to_owned();
    }

    let mut groups = Vec::new();
    let mut remaining = value;
    while remaining > 0 {
        groups.push((remaining % 1000) as u64);
        remaining /= 1000;
    }

    // (scale index, group value) from the most significant group down.
    let named: Vec<(usize, u64)> = groups
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, group)| **group > 0)
        .map(|(scale, group)| (scale, *group))
        .collect();

    let mut out = String::new();
    for (position, (scale, group)) in named.iter().enumerate() {
        let words = match scale {
            0 => group_in_words(*group),
            1 if *group == 1 => SCALES[0].0.to_owned(),
            1 => format!("{} {}", group_in_words(*group), SCALES[0].1),
            _ => {
                let (singular, plural) = scale_name(*scale);
                let name = if *group == 1 { singular } else { plural };
                format!("{} {}", group_in_words(*group), name)
            }
        };

        if position > 0 {
            let is_last = position + 1 == named.len();
            if is_last && (*group < 100 || *group % 100 == 0) {
                out.push_str(" e ");
            } else {
                out.push(' ');
            }
        }
        out.push_str(&words);
    }
    out
}

fn scale_name(scale: usize) -> (&'static str, &'static str) {
    SCALES
        .get(scale - 1)
        .copied()
        .unwrap_or(SCALES[SCALES.len() - 1])
}

/// Spells out a monetary amount in reais and centavos.
///
/// `999.90` becomes `novecentos e noventa e nove reais e noventa centavos`.
pub fn amount_in_words(value: f64) -> String {
    let (negative, cents) = to_cents(value);
    let reais = cents / 100;
    let centavos = cents % 100;

    let mut out = String::new();
    if negative {
        out.push_str("menos ");
    }

    if reais > 0 || centavos == 0 {
        out.push_str(&integer_in_words(reais));
        // Whole millions and above take "de": "um milhão de reais".
        if reais >= 1_000_000 && reais % 1_000_000 == 0 {
            out.push_str(" de");
        }
        out.push_str(if reais == 1 { " real" } else { " reais" });
    }

    if centavos > 0 {
        if reais > 0 {
            out.push_str(" e ");
        }
        out.push_str(&integer_in_words(centavos));
        out.push_str(if centavos == 1 { " centavo" } else { " centavos" });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{amount_in_words, integer_in_words};

    #[test]
    fn spells_small_numbers() {
        assert_eq!(integer_in_words(0), "zero");
        assert_eq!(integer_in_words(16), "dezesseis");
        assert_eq!(integer_in_words(21), "vinte e um");
        assert_eq!(integer_in_words(100), "cem");
        assert_eq!(integer_in_words(101), "cento e um");
        assert_eq!(integer_in_words(999), "novecentos e noventa e nove");
    }

    #[test]
    fn joins_thousands_like_written_portuguese() {
        assert_eq!(integer_in_words(1000), "mil");
        assert_eq!(integer_in_words(1100), "mil e cem");
        assert_eq!(integer_in_words(1250), "mil duzentos e cinquenta");
        assert_eq!(integer_in_words(2005), "dois mil e cinco");
        assert_eq!(
            integer_in_words(1_500_000),
            "um milhão e quinhentos mil"
        );
        assert_eq!(
            integer_in_words(2_300_450),
            "dois milhões trezentos mil quatrocentos e cinquenta"
        );
    }

    #[test]
    fn spells_amounts_with_currency() {
        assert_eq!(
            amount_in_words(999.90),
            "novecentos e noventa e nove reais e noventa centavos"
        );
        assert_eq!(amount_in_words(1.0), "um real");
        assert_eq!(amount_in_words(0.01), "um centavo");
        assert_eq!(amount_in_words(0.0), "zero reais");
        assert_eq!(amount_in_words(1_000_000.0), "um milhão de reais");
        assert_eq!(
            amount_in_words(1250.5),
            "mil duzentos e cinquenta reais e cinquenta centavos"
        );
        assert_eq!(amount_in_words(-2.0), "menos dois reais");
    }

    #[test]
    fn spells_amounts_past_u64_cents() {
        assert_eq!(integer_in_words(1_000_000_000_000_000_000), "um quintilhão");
        assert_eq!(amount_in_words(1e18), "um quintilhão de reais");
    }
}
