/// Index of the last element satisfying `pred`, where `pred` holds for a
/// prefix of `items` and fails for the rest.
///
/// Every lookup in this module is a specialisation of this one primitive:
/// "rightmost segment starting at or before", "rightmost marker starting at
/// or before", "rightmost map entry at or below".
pub fn rightmost_index<T>(items: &[T], pred: impl FnMut(&T) -> bool) -> Option<usize> {
    items.partition_point(pred).checked_sub(1)
}
