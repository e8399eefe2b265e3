//! Address canonicalization for geocode cache keys.
//!
//! Lower-cases, folds Latin diacritics (precomposed or decomposed), drops
//! punctuation, collapses whitespace and expands common Spanish street
//! abbreviations, so that
//! `"Av. Constitución  #12"` and `"avenida constitucion numero 12"` share a key.

/// Returns the canonical cache key for `address`. Never fails; an empty
/// result means the address had no usable characters.
pub fn normalize(address: &str) -> String {
    let mut folded = String::with_capacity(address.len());
    for ch in address.chars().flat_map(char::to_lowercase) {
        match ch {
            '#' => folded.push_str(" # "),
            ',' | ';' | '.' | ':' | '(' | ')' | '"' | '\'' => folded.push(' '),
            // Combining diacritical marks, as left by decomposed (NFD) input.
            '\u{0300}'..='\u{036f}' => {}
            _ => folded.push(fold_diacritic(ch)),
        }
    }

    let mut key = String::with_capacity(folded.len());
    for token in folded.split_whitespace() {
        if !key.is_empty() {
            key.push(' ');
        }
        key.push_str(expand_abbreviation(token));
    }
    key
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        'º' | '°' => 'o',
        _ => ch,
    }
}

fn expand_abbreviation(token: &str) -> &str {
    match token {
        "av" | "avd" | "avda" | "ave" => "avenida",
        "c/" | "cl" | "cll" => "calle",
        "cra" | "kr" | "kra" | "cr" => "carrera",
        "dg" | "diag" => "diagonal",
        "tv" | "transv" | "trans" => "transversal",
        "pje" | "psje" => "pasaje",
        "pza" | "pl" => "plaza",
        "ctra" => "carretera",
        "bo" | "barr" => "barrio",
        "#" | "no" | "nro" | "num" => "numero",
        "dpto" | "depto" | "dto" => "departamento",
        "esq" => "esquina",
        "s/n" => "sin numero",
        _ => token,
    }
}
