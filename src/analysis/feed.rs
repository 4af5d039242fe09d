use crate::models::bubble::Bubble;
use rand::Rng;

/// Fisher–Yates over a copy; the caller's slice is left as is.
pub fn shuffle_bubbles<R: Rng + ?Sized>(bubbles: &[Bubble], rng: &mut R) -> Vec<Bubble> {
    let mut out = bubbles.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Random selection of other people's top-level bubbles.
pub fn discovery_feed<R: Rng + ?Sized>(
    bubbles: &[Bubble],
    viewer_id: Option<&str>,
    limit: usize,
    rng: &mut R,
) -> Vec<Bubble> {
    let candidates: Vec<Bubble> = bubbles
        .iter()
        .filter(|b| !b.is_reply())
        .filter(|b| viewer_id != Some(b.owner_id.as_str()))
        .cloned()
        .collect();

    let mut feed = shuffle_bubbles(&candidates, rng);
    feed.truncate(limit);
    feed
}
