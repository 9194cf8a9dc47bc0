/// Join extracted keywords into the single search string sent to the
/// search backend.
///
/// Keywords keep their original order and are separated by one space. Blank
/// keywords are dropped; `None` means there is nothing to search for.
pub fn combine_search_terms(terms: &[String]) -> Option<String> {
    let joined = terms
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!joined.is_empty()).then_some(joined)
}
