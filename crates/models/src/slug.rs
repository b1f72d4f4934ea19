//! URL-safe identifiers derived from titles.

use unicode_normalization::UnicodeNormalization;

/// Lowercase, ASCII-fold, collapse every run of non-alphanumeric characters into a
/// single `-`, trim leading/trailing hyphens.
///
/// Accented Latin letters fold to their base letter (`é` → `e`); characters with no
/// ASCII decomposition act as separators.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.nfkd() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else if !is_combining_mark(c) {
            pending_dash = true;
        }
    }
    out
}

/// Combining diacritics left behind by NFKD (`e` + U+0301).
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn folds_accents_and_lowercases() {
        assert_eq!(slugify("Rénovation Cuisine Moderne"), "renovation-cuisine-moderne");
        assert_eq!(slugify("Salle de Bain Élégante"), "salle-de-bain-elegante");
    }

    #[test]
    fn collapses_separator_runs_and_trims() {
        assert_eq!(slugify("  Plomberie -- & Chauffage!  "), "plomberie-chauffage");
        assert_eq!(slugify("Cuisine Ouverte avec Verrière (30 m²)"), "cuisine-ouverte-avec-verriere-30-m2");
        assert_eq!(slugify("L'été_2024"), "l-ete-2024");
    }

    #[test]
    fn nothing_alphanumeric_yields_empty() {
        assert_eq!(slugify(" -- !! "), "");
        assert_eq!(slugify(""), "");
    }
}
