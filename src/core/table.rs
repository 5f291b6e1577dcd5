// --- File: src/core/table.rs

/// The accented letters this tool rewrites, paired with their HTML entity names.
/// Lowercase/uppercase pairs, in the order they are listed for `--list`.
pub const ENTRIES: [(char, &str); 26] = [
    ('à', "agrave"), ('À', "Agrave"),
    ('â', "acirc"), ('Â', "Acirc"),
    ('ç', "ccedil"), ('Ç', "Ccedil"),
    ('é', "eacute"), ('É', "Eacute"),
    ('è', "egrave"), ('È', "Egrave"),
    ('ê', "ecirc"), ('Ê', "Ecirc"),
    ('ë', "euml"), ('Ë', "Euml"),
    ('î', "icirc"), ('Î', "Icirc"),
    ('ï', "iuml"), ('Ï', "Iuml"),
    ('ô', "ocirc"), ('Ô', "Ocirc"),
    ('ö', "ouml"), ('Ö', "Ouml"),
    ('ù', "ugrave"), ('Ù', "Ugrave"),
    ('û', "ucirc"), ('Û', "Ucirc"),
];

/// Looks up the entity name for a single character.
///
/// Duplicates `ENTRIES` so the lookup is a plain `match`;
/// `lookup_agrees_with_entries` keeps the two identical.
pub fn entity_name(c: char) -> Option<&'static str> {
    match c {
        'à' => Some("agrave"), 'À' => Some("Agrave"),
        'â' => Some("acirc"), 'Â' => Some("Acirc"),
        'ç' => Some("ccedil"), 'Ç' => Some("Ccedil"),
        'é' => Some("eacute"), 'É' => Some("Eacute"),
        'è' => Some("egrave"), 'È' => Some("Egrave"),
        'ê' => Some("ecirc"), 'Ê' => Some("Ecirc"),
        'ë' => Some("euml"), 'Ë' => Some("Euml"),
        'î' => Some("icirc"), 'Î' => Some("Icirc"),
        'ï' => Some("iuml"), 'Ï' => Some("Iuml"),
        'ô' => Some("ocirc"), 'Ô' => Some("Ocirc"),
        'ö' => Some("ouml"), 'Ö' => Some("Ouml"),
        'ù' => Some("ugrave"), 'Ù' => Some("Ugrave"),
        'û' => Some("ucirc"), 'Û' => Some("Ucirc"),
        _ => None,
    }
}

/// Appends the character reference (`&eacute;`) for `c` to `out`.
/// Returns false, leaving `out` untouched, when `c` is not tabled.
pub fn push_entity(c: char, out: &mut String) -> bool {
    match entity_name(c) {
        Some(name) => {
            out.push('&');
            out.push_str(name);
            out.push(';');
            true
        }
        None => false,
    }
}
