//! Priority and weight ordering of SRV records per RFC 2782.

use crate::SrvRecord;
use rand::Rng;

/// How records with a weight of zero take part in the weighted draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroWeight {
    /// Weight zero is an ordinary weight. A group whose weights are all zero
    /// keeps its input order.
    #[default]
    Uniform,
    /// Zero-weight records are moved to the front of the pool before every
    /// draw, so they are only picked on a draw of zero while any nonzero
    /// weight remains.
    Rfc2782,
}

/// Orders SRV records by ascending priority, then by weighted random
/// selection within each priority, returning the reordered records.
pub fn order<R: SrvRecord>(mut records: Vec<R>, rng: impl Rng) -> Vec<R> {
    order_in_place(&mut records, ZeroWeight::Uniform, rng);
    records
}

/// Orders SRV records in place. See [`order`].
pub fn order_in_place<R: SrvRecord>(
    records: &mut [R],
    zero_weight: ZeroWeight,
    mut rng: impl Rng,
) {
    // Stable, so each priority group starts out in arrival order.
    records.sort_by_key(R::priority);

    let mut start = 0;
    while start < records.len() {
        let priority = records[start].priority();
        let len = records[start..]
            .iter()
            .take_while(|record| record.priority() == priority)
            .count();
        shuffle_group(&mut records[start..start + len], zero_weight, &mut rng);
        start += len;
    }
}

/// Weighted sampling without replacement over one priority group. The
/// ordered prefix grows by one each round; the chosen record is rotated out
/// of the unordered tail so the rest of the tail keeps its relative order.
fn shuffle_group<R: SrvRecord>(group: &mut [R], zero_weight: ZeroWeight, rng: &mut impl Rng) {
    for next in 0..group.len().saturating_sub(1) {
        let pool = &mut group[next..];
        if zero_weight == ZeroWeight::Rfc2782 {
            pool.sort_by_key(|record| record.weight() != 0);
        }

        let total: u64 = pool.iter().map(|record| u64::from(record.weight())).sum();
        let draw = rng.random_range(0..=total);

        let mut running = 0;
        let chosen = pool
            .iter()
            .position(|record| {
                running += u64::from(record.weight());
                running >= draw
            })
            .unwrap_or(pool.len() - 1);
        pool[..=chosen].rotate_right(1);
    }
}
