use egui::{Pos2, Rect};

/// Index of the candidate the dragged item should be inserted before, or `None` to append.
///
/// Picks the candidate whose bounding-box center is closest to `pointer`. Ties go to the
/// earliest candidate. Grid and flow layouts wrap, so "nearest center" beats comparing x or y
/// alone.
///
/// The caller must leave the dragged item out of `candidates`.
pub fn find_insertion_anchor<I>(candidates: I, pointer: Pos2) -> Option<usize>
where
    I: IntoIterator<Item = Rect>,
{
    candidates
        .into_iter()
        .enumerate()
        .map(|(index, rect)| (index, rect.center().distance(pointer)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _distance)| index)
}
