/// Compute effective limit with precedence: global flag -> configured page size.
///
/// The executor still caps the result at `search.max_rows`.
#[must_use]
pub fn effective_limit(global: Option<u32>, page_size: u32) -> usize {
    let limit = global.unwrap_or(page_size);
    usize::try_from(limit).unwrap_or(usize::MAX)
}
