//! Stochastic swap operator over candidate solutions.

use rand::Rng;

use crate::solution::PlacedExam;

/// Produces a neighbor by exchanging the subject payload (subject, duration,
/// student group) of two distinct placements while each slot keeps its
/// (date, shift, room, start). End times are re-derived from the transplanted
/// durations.
///
/// Feasibility is deliberately not checked here: shift overflow, room overlap
/// and student clashes introduced by the swap are priced by the cost model,
/// which is the sole arbiter during descent.
pub fn swap_neighbor<R: Rng>(placements: &[PlacedExam], rng: &mut R) -> Vec<PlacedExam> {
    let mut neighbor = placements.to_vec();
    if neighbor.len() < 2 {
        return neighbor;
    }

    let i = rng.gen_range(0..neighbor.len());
    let mut j = rng.gen_range(0..neighbor.len());
    while j == i {
        j = rng.gen_range(0..neighbor.len());
    }

    let (lo, hi) = (i.min(j), i.max(j));
    let (head, tail) = neighbor.split_at_mut(hi);
    let (a, b) = (&mut head[lo], &mut tail[0]);
    std::mem::swap(&mut a.subject, &mut b.subject);
    std::mem::swap(&mut a.duration_minutes, &mut b.duration_minutes);
    std::mem::swap(&mut a.student_ids, &mut b.student_ids);
    a.recompute_end();
    b.recompute_end();

    neighbor
}
