use rand::Rng;

/// Longest product-name prefix carried into a SKU.
const NAME_PREFIX_LEN: usize = 8;
const RANDOM_SEGMENT_LEN: usize = 4;

// Ambiguous glyphs (0/O, 1/I/L) are left out of generated segments.
const RANDOM_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Builds a stock-keeping unit from product name, color code, and optionally a
/// size label: `("Classic Cotton T-Shirt", "NVY", Some("M"))` becomes
/// `"CLASSICC-NVY-M"`.
///
/// Deterministic for non-degenerate inputs. A segment that cleans down to
/// nothing is replaced by a short random suffix, so the output is never empty
/// but no longer reproducible; uniqueness is re-validated at the variant level
/// either way.
pub fn generate_sku(product_name: &str, color_code: &str, size: Option<&str>) -> String {
    let mut sku = format!(
        "{}-{}",
        clean_segment(product_name, NAME_PREFIX_LEN),
        clean_segment(color_code, NAME_PREFIX_LEN),
    );
    if let Some(size) = size {
        sku.push('-');
        sku.push_str(&clean_segment(size, NAME_PREFIX_LEN));
    }
    sku
}

/// Uppercased alphanumerics only, truncated to `max_len`.
fn clean_segment(raw: &str, max_len: usize) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(max_len)
        .collect();

    if cleaned.is_empty() {
        random_segment()
    } else {
        cleaned
    }
}

fn random_segment() -> String {
    let mut rng = rand::thread_rng();
    (0..RANDOM_SEGMENT_LEN)
        .map(|_| RANDOM_ALPHABET[rng.gen_range(0..RANDOM_ALPHABET.len())] as char)
        .collect()
}
