#![forbid(unsafe_code)]

//! Column width solving.
//!
//! Columns are fixed-width or flexible; flexible columns split the space
//! left after fixed widths and inter-column spacing, with remainder pixels
//! handed out left to right so the result is fully deterministic. The same
//! solved bands must be used by the sticky header and every body row — two
//! independent solves can never be needed, and sharing one is what keeps
//! header and body from drifting.

/// Width behavior of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSpec {
    /// Exactly this many pixels.
    Fixed(u32),
    /// An equal share of the remaining space.
    Flex,
}

/// A solved column: horizontal position and width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnBand {
    /// Left edge relative to the table.
    pub x: u32,
    /// Column width.
    pub width: u32,
}

/// Solve column bands for `available` pixels with `spacing` between
/// columns.
///
/// Fixed widths are honored even when they overflow `available` (the host
/// clips); flex columns then get zero. Call once per render pass and reuse
/// the result for both header and body.
#[must_use]
pub fn solve_columns(specs: &[ColumnSpec], available: u32, spacing: u32) -> Vec<ColumnBand> {
    if specs.is_empty() {
        return Vec::new();
    }
    let spacing_total = spacing.saturating_mul((specs.len() - 1) as u32);
    let fixed_total: u32 = specs
        .iter()
        .map(|s| match s {
            ColumnSpec::Fixed(w) => *w,
            ColumnSpec::Flex => 0,
        })
        .fold(0, u32::saturating_add);
    let flex_count = specs
        .iter()
        .filter(|s| matches!(s, ColumnSpec::Flex))
        .count() as u32;
    let remaining = available
        .saturating_sub(spacing_total)
        .saturating_sub(fixed_total);
    let (share, mut remainder) = if flex_count > 0 {
        (remaining / flex_count, remaining % flex_count)
    } else {
        (0, 0)
    };

    let mut bands = Vec::with_capacity(specs.len());
    let mut x = 0u32;
    for spec in specs {
        let width = match spec {
            ColumnSpec::Fixed(w) => *w,
            ColumnSpec::Flex => {
                let extra = u32::from(remainder > 0);
                remainder = remainder.saturating_sub(1);
                share + extra
            }
        };
        bands.push(ColumnBand { x, width });
        x = x.saturating_add(width).saturating_add(spacing);
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_only() {
        let bands = solve_columns(
            &[ColumnSpec::Fixed(40), ColumnSpec::Fixed(100)],
            500,
            8,
        );
        assert_eq!(bands, vec![
            ColumnBand { x: 0, width: 40 },
            ColumnBand { x: 48, width: 100 },
        ]);
    }

    #[test]
    fn flex_shares_remaining_space() {
        // 500 - 1 spacing of 10 - fixed 100 = 390 over 2 flex: 195 each.
        let bands = solve_columns(
            &[ColumnSpec::Fixed(100), ColumnSpec::Flex, ColumnSpec::Flex],
            520,
            10,
        );
        assert_eq!(bands[0], ColumnBand { x: 0, width: 100 });
        assert_eq!(bands[1], ColumnBand { x: 110, width: 195 });
        assert_eq!(bands[2], ColumnBand { x: 315, width: 195 });
        assert_eq!(bands[2].x + bands[2].width, 510);
    }

    #[test]
    fn remainder_pixels_go_left_to_right() {
        let bands = solve_columns(&[ColumnSpec::Flex; 3], 100, 0);
        assert_eq!(
            bands.iter().map(|b| b.width).collect::<Vec<_>>(),
            vec![34, 33, 33]
        );
        assert_eq!(bands.iter().map(|b| b.width).sum::<u32>(), 100);
    }

    #[test]
    fn overflowing_fixed_widths_zero_the_flex() {
        let bands = solve_columns(&[ColumnSpec::Fixed(800), ColumnSpec::Flex], 500, 4);
        assert_eq!(bands[0].width, 800);
        assert_eq!(bands[1].width, 0);
    }

    #[test]
    fn empty_specs() {
        assert!(solve_columns(&[], 500, 4).is_empty());
    }

    proptest! {
        #[test]
        fn prop_flex_layouts_fill_exactly(
            fixed in prop::collection::vec(0u32..80, 0..4),
            flex_count in 1usize..5,
            spacing in 0u32..8,
            available in 400u32..2_000,
        ) {
            let mut specs: Vec<ColumnSpec> =
                fixed.iter().map(|&w| ColumnSpec::Fixed(w)).collect();
            specs.extend(std::iter::repeat_n(ColumnSpec::Flex, flex_count));
            let bands = solve_columns(&specs, available, spacing);
            let used = bands.iter().map(|b| b.width).sum::<u32>()
                + spacing * (specs.len() - 1) as u32;
            // Fixed total stays under `available` here, so flex fills it.
            prop_assert_eq!(used, available);
            // Bands tile without overlap.
            for pair in bands.windows(2) {
                prop_assert_eq!(pair[1].x, pair[0].x + pair[0].width + spacing);
            }
        }

        #[test]
        fn prop_solver_is_deterministic(
            available in 0u32..1_500,
            spacing in 0u32..10,
        ) {
            let specs = [
                ColumnSpec::Fixed(120),
                ColumnSpec::Flex,
                ColumnSpec::Fixed(60),
                ColumnSpec::Flex,
            ];
            // Header and body both solve from the same inputs; the bands
            // must be identical every time.
            let header = solve_columns(&specs, available, spacing);
            let body = solve_columns(&specs, available, spacing);
            prop_assert_eq!(header, body);
        }
    }
}
