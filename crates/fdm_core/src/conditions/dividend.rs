//! Discrete-dividend step condition.

use super::{StepCondition, TIME_EPS};
use crate::layout::OpLayout;

/// Shifts the grid's spatial interpretation by a cash dividend.
///
/// Rolling backwards across an ex-dividend date, the value at spot `S`
/// becomes the pre-dividend value at `S + D`, read off the grid by
/// linear interpolation along the payoff axis and clamped at the grid
/// edges. Applied exactly once per dividend date; a zero amount is an
/// identity.
pub struct DividendCondition {
    layout: OpLayout,
    direction: usize,
    /// Spot coordinates along the payoff axis (already transformed out
    /// of any log scale by the caller).
    spots: Vec<f64>,
    times: Vec<f64>,
    amounts: Vec<f64>,
}

impl DividendCondition {
    /// Build from the dividend schedule and the payoff axis.
    ///
    /// `spots` must match the axis of `direction` in the layout;
    /// `times` and `amounts` pair up one-to-one.
    pub fn new(
        layout: OpLayout,
        direction: usize,
        spots: Vec<f64>,
        times: Vec<f64>,
        amounts: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(times.len(), amounts.len());
        debug_assert_eq!(spots.len(), layout.dims()[direction]);
        Self {
            layout,
            direction,
            spots,
            times,
            amounts,
        }
    }

    /// The dividend times, for stopping-time registration.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Linear interpolation of one grid line at `s`, flat beyond the
    /// edges.
    fn interpolate_line(&self, line: &[f64], s: f64) -> f64 {
        let n = self.spots.len();
        if s <= self.spots[0] {
            return line[0];
        }
        if s >= self.spots[n - 1] {
            return line[n - 1];
        }
        let i = self.spots.partition_point(|&x| x <= s) - 1;
        let w = (s - self.spots[i]) / (self.spots[i + 1] - self.spots[i]);
        line[i] + w * (line[i + 1] - line[i])
    }
}

impl StepCondition for DividendCondition {
    fn apply_to(&mut self, a: &mut [f64], t: f64) {
        let Some(k) = self
            .times
            .iter()
            .position(|&dt| (dt - t).abs() <= TIME_EPS)
        else {
            return;
        };
        let dividend = self.amounts[k];
        if dividend == 0.0 {
            return;
        }

        let stride = self.layout.spacing()[self.direction];
        let n = self.layout.dims()[self.direction];
        let mut line = vec![0.0; n];

        for base in 0..a.len() {
            if self.layout.coord(base, self.direction) != 0 {
                continue;
            }
            for (j, v) in line.iter_mut().enumerate() {
                *v = a[base + j * stride];
            }
            for j in 0..n {
                a[base + j * stride] = self.interpolate_line(&line, self.spots[j] + dividend);
            }
        }
    }
}

impl std::fmt::Debug for DividendCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DividendCondition")
            .field("direction", &self.direction)
            .field("times", &self.times)
            .field("amounts", &self.amounts)
            .finish()
    }
}
