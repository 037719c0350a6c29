//! Line splitting for vpncmd report output

/// Split raw tool output into an ordered sequence of `(key, value)` pairs.
///
/// A line qualifies only if it contains the `|` delimiter; it is split on the
/// first occurrence, the key is trimmed of surrounding whitespace and the
/// value is kept verbatim (vpncmd conventionally emits a single leading space
/// before the value). Lines without a delimiter are banners or separators and
/// are dropped silently.
pub fn report_pairs(output: &str) -> impl Iterator<Item = (String, String)> + '_ {
    output.lines().filter_map(|text| {
        let (key, value) = text.split_once('|')?;
        Some((key.trim().to_string(), value.to_string()))
    })
}
