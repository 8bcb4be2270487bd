//! 16-bit bucket (counting) sort of front-to-back depths.

const BUCKET_COUNT: usize = 65536;
const DEPTH_SCALE: f32 = 4096.0;

/// Result of one sort pass: a dense, front-to-back ordered index array over
/// visible splats, plus the counts needed by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortOutput {
    pub indices: Vec<u32>,
    pub visible_count: u32,
    pub total_count: u32,
}

/// Culls by alpha cutoff and depth-sorts the survivors front-to-back.
///
/// `positions` is the flattened `[x, y, z]` float view of the packed buffer
/// (length `3 * total_count`); `alpha` is the per-splat opacity byte view
/// (length `total_count`). `view_proj` is the column-major composite
/// view-projection matrix; only row 2 (`indices 2, 6, 10`) is used.
pub fn sort_visible(
    positions: &[f32],
    alpha: &[u8],
    view_proj: &[f32; 16],
    alpha_cutoff: u8,
) -> SortOutput {
    let total_count = alpha.len() as u32;
    let _span = tracing::trace_span!("sort_visible", total_count).entered();

    let visible: Vec<u32> = (0..alpha.len())
        .filter(|&i| alpha[i] >= alpha_cutoff)
        .map(|i| i as u32)
        .collect();
    let m = visible.len();

    if m == 0 {
        return SortOutput {
            indices: Vec::new(),
            visible_count: 0,
            total_count,
        };
    }

    let (row2, row6, row10) = (view_proj[2], view_proj[6], view_proj[10]);

    let depth_of = |i: u32| -> i32 {
        let o = 3 * i as usize;
        let d = row2 * positions[o] + row6 * positions[o + 1] + row10 * positions[o + 2];
        (d * DEPTH_SCALE).floor() as i32
    };

    let mut min_depth = i32::MAX;
    let mut max_depth = i32::MIN;
    let depths: Vec<i32> = visible
        .iter()
        .map(|&i| {
            let d = depth_of(i);
            min_depth = min_depth.min(d);
            max_depth = max_depth.max(d);
            d
        })
        .collect();

    let buckets: Vec<usize> = if max_depth == min_depth {
        vec![0; m]
    } else {
        let span = (max_depth - min_depth) as f32;
        depths
            .iter()
            .map(|&d| {
                let b = ((d - min_depth) as f32 * (BUCKET_COUNT - 1) as f32 / span) as i64;
                b.clamp(0, BUCKET_COUNT as i64 - 1) as usize
            })
            .collect()
    };

    let mut counts = vec![0_u32; BUCKET_COUNT];
    for &b in &buckets {
        counts[b] += 1;
    }

    let mut starts = vec![0_u32; BUCKET_COUNT];
    for b in 1..BUCKET_COUNT {
        starts[b] = starts[b - 1] + counts[b - 1];
    }

    let mut out = vec![0_u32; m];
    for (j, &original_index) in visible.iter().enumerate() {
        let b = buckets[j];
        let dst = starts[b] as usize;
        out[dst] = original_index;
        starts[b] += 1;
    }

    SortOutput {
        indices: out,
        visible_count: m as u32,
        total_count,
    }
}
