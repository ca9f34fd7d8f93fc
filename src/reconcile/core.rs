use crate::error::{LayoutError, Result};
use crate::header::{ColumnHeader, PERCENTAGE_EPSILON};
use crate::permutation::ColumnPermutation;

/// Displayed header set derived from the full set.
#[derive(Debug, Clone, Default)]
pub struct PermutedHeaders {
    pub headers: Vec<ColumnHeader>,
    /// One fixed column was promoted to fill the trailing space. The promotion
    /// is never written back to the full set.
    pub auto_fill_applied: bool,
}

/// Check that proportional percentages ascend strictly inside `0..=1` and
/// that the last one ends at 1.0 (within [`PERCENTAGE_EPSILON`]).
pub fn validate_percentages(headers: &[ColumnHeader]) -> Result<()> {
    let mut previous = 0.0;
    let mut last_variable = None;
    for (column, header) in headers.iter().enumerate() {
        if header.is_fixed() {
            continue;
        }
        let percentage = header.percentage();
        if !(0.0..=1.0 + PERCENTAGE_EPSILON).contains(&percentage) {
            return Err(LayoutError::PercentageOutOfRange { column, percentage });
        }
        if percentage <= previous {
            return Err(LayoutError::PercentagesNotAscending {
                column,
                percentage,
                previous,
            });
        }
        // Anything already at 1.0 would collide with the snapped last column.
        if last_variable.is_some() && previous >= 1.0 {
            return Err(LayoutError::PercentagesNotAscending {
                column,
                percentage,
                previous,
            });
        }
        previous = percentage;
        last_variable = Some(column);
    }

    match last_variable {
        Some(column) if (previous - 1.0).abs() > PERCENTAGE_EPSILON => {
            Err(LayoutError::LastPercentageInvalid {
                column,
                percentage: previous,
            })
        }
        _ => Ok(()),
    }
}

/// Force the last proportional column to end at exactly 1.0.
pub fn snap_last_percentage(headers: &mut [ColumnHeader]) {
    if let Some(last) = headers.iter_mut().rev().find(|header| !header.is_fixed()) {
        last.set_percentage(1.0);
    }
}

/// Divide the proportional area evenly between every proportional column.
pub fn even_percentages(headers: &mut [ColumnHeader]) {
    let count = headers.iter().filter(|header| !header.is_fixed()).count();
    let mut seen = 0;
    for header in headers.iter_mut().filter(|header| !header.is_fixed()) {
        seen += 1;
        header.set_percentage(seen as f32 / count as f32);
    }
    snap_last_percentage(headers);
}

/// Fixed column to promote when nothing is proportional: the right-most
/// adjustable one, or the left-most under right-to-left layout.
pub fn find_auto_fill_index(headers: &[ColumnHeader], right_to_left: bool) -> Option<usize> {
    if headers.iter().any(|header| !header.is_fixed()) {
        return None;
    }
    let mut columns = headers.iter().enumerate();
    let found = if right_to_left {
        columns.find(|(_, header)| header.is_adjustable())
    } else {
        columns.rfind(|(_, header)| header.is_adjustable())
    };
    found.map(|(index, _)| index)
}

/// Copy of `full` with the auto-fill column promoted, or `None` when there is
/// nothing to promote.
pub fn auto_fill_headers(full: &[ColumnHeader], right_to_left: bool) -> Option<Vec<ColumnHeader>> {
    let column = find_auto_fill_index(full, right_to_left)?;
    let mut headers = full.to_vec();
    headers[column].set_percentage(1.0);
    Some(headers)
}

/// Derive the displayed header set from the full set.
///
/// Hidden proportional columns give up their share; the visible ones are
/// rescaled so they fill the proportional area again, and cumulative values
/// are rebuilt in display order.
pub fn permute_headers(
    full: &[ColumnHeader],
    permutation: Option<&dyn ColumnPermutation>,
    auto_fill: bool,
    right_to_left: bool,
) -> PermutedHeaders {
    let Some(permutation) = permutation else {
        if auto_fill {
            if let Some(headers) = auto_fill_headers(full, right_to_left) {
                return PermutedHeaders {
                    headers,
                    auto_fill_applied: true,
                };
            }
        }
        return PermutedHeaders {
            headers: full.to_vec(),
            auto_fill_applied: false,
        };
    };

    let shares = incremental_shares(full);
    let skipped: f32 = shares
        .iter()
        .enumerate()
        .filter(|(native, _)| permutation.permuted_column(*native).is_none())
        .map(|(_, share)| share)
        .sum();
    let remaining = 1.0 - skipped;

    let natives: Vec<usize> = (0..permutation.visible_column_count())
        .filter_map(|display| permutation.native_column(display))
        .filter(|native| *native < full.len())
        .collect();
    let mut headers: Vec<ColumnHeader> = natives.iter().map(|&native| full[native].clone()).collect();

    if remaining > PERCENTAGE_EPSILON {
        let mut cumulative = 0.0;
        for (header, &native) in headers.iter_mut().zip(&natives) {
            if !header.is_fixed() {
                cumulative += shares[native] / remaining;
                header.set_percentage(cumulative);
            }
        }
        snap_last_percentage(&mut headers);
    } else {
        // The visible columns had no share left to scale.
        even_percentages(&mut headers);
    }

    let mut auto_fill_applied = false;
    if auto_fill {
        if let Some(column) = find_auto_fill_index(&headers, right_to_left) {
            headers[column].set_percentage(1.0);
            auto_fill_applied = true;
        }
    }

    PermutedHeaders {
        headers,
        auto_fill_applied,
    }
}

/// Fold changes made to the displayed set back into the full set.
///
/// Without a permutation or auto-fill the displayed set mirrors the full set
/// and is copied back as is. With auto-fill, or when nothing displayed is
/// proportional, only widths travel back. Otherwise each visible
/// proportional column's displayed share is scaled by the share the visible
/// columns hold in the full set, so hidden columns keep theirs.
pub fn reverse_integrate(
    displayed: &[ColumnHeader],
    permutation: Option<&dyn ColumnPermutation>,
    auto_fill_applied: bool,
    full: &mut [ColumnHeader],
) {
    let Some(permutation) = permutation.filter(|_| !auto_fill_applied) else {
        if permutation.is_none() && !auto_fill_applied {
            for (target, source) in full.iter_mut().zip(displayed) {
                target.set_width(source.width());
                target.set_percentage(source.percentage());
            }
        } else {
            copy_widths(displayed, permutation, full);
        }
        return;
    };

    if displayed.iter().all(ColumnHeader::is_fixed) {
        copy_widths(displayed, Some(permutation), full);
        return;
    }

    let displayed_shares = incremental_shares(displayed);
    let mut shares = incremental_shares(full);
    let mut base = 0.0;
    for (native, header) in full.iter_mut().enumerate() {
        let Some(display) = permutation.permuted_column(native) else {
            continue;
        };
        if header.is_fixed() {
            if let Some(source) = displayed.get(display) {
                header.set_width(source.width());
            }
        } else {
            base += shares[native];
        }
    }

    if base > PERCENTAGE_EPSILON {
        for (native, header) in full.iter().enumerate() {
            if header.is_fixed() {
                continue;
            }
            let displayed_share = permutation
                .permuted_column(native)
                .and_then(|display| displayed_shares.get(display));
            if let Some(share) = displayed_share {
                shares[native] = share * base;
            }
        }
    }

    let mut cumulative = 0.0;
    for (header, share) in full.iter_mut().zip(&shares) {
        if !header.is_fixed() {
            cumulative += share;
            header.set_percentage(cumulative);
        }
    }
    snap_last_percentage(full);
}

/// Own share of each proportional column, zero for fixed columns.
fn incremental_shares(headers: &[ColumnHeader]) -> Vec<f32> {
    let mut previous = 0.0;
    headers
        .iter()
        .map(|header| {
            if header.is_fixed() {
                0.0
            } else {
                let share = header.percentage() - previous;
                previous = header.percentage();
                share
            }
        })
        .collect()
}

fn copy_widths(
    displayed: &[ColumnHeader],
    permutation: Option<&dyn ColumnPermutation>,
    full: &mut [ColumnHeader],
) {
    for (display, source) in displayed.iter().enumerate() {
        let native = match permutation {
            Some(permutation) => permutation.native_column(display),
            None => Some(display),
        };
        if let Some(target) = native.and_then(|native| full.get_mut(native)) {
            target.set_width(source.width());
        }
    }
}
