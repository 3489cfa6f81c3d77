//! Scheme step kernels and the backward time-marching loop.
//!
//! Sign convention: the PDE is `dV/dt = -A(t) V`, so one backward step
//! from `t` to `t - dt` evolves the grid with the (approximate)
//! propagator of `exp(-dt A)`. Every kernel follows the same shape: one
//! explicit full-operator pass, then per-direction implicit solves;
//! the Craig-Sneyd family and Hundsdorfer add a corrector pass. Mixed
//! derivatives are only ever applied explicitly.

use crate::boundary::BoundaryConditionSet;
use crate::conditions::StepConditionComposite;
use crate::error::FdmError;
use crate::math::BiCgStab;
use crate::operator::LinearOpComposite;
use crate::solver::{SchemeDesc, SchemeKind};

use tracing::debug;

/// Matching tolerance between sweep times and stopping times.
const TIME_EPS: f64 = 1e-10;

/// Relative tolerance of the iterative solve inside implicit Euler
/// steps.
const IMPLICIT_EULER_TOL: f64 = 1e-8;

fn add_scaled(a: &[f64], b: &[f64], s: f64) -> Vec<f64> {
    a.iter().zip(b).map(|(ai, bi)| ai + s * bi).collect()
}

fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(ai, bi)| ai - bi).collect()
}

fn step_douglas(
    op: &mut dyn LinearOpComposite,
    bc: &mut BoundaryConditionSet,
    a: &mut Vec<f64>,
    t: f64,
    dt: f64,
    theta: f64,
) {
    op.set_time((t - dt).max(0.0), t);
    bc.set_time((t - dt).max(0.0));

    let mut y = add_scaled(a, &op.apply(a), dt);
    bc.apply_after_applying(&mut y);

    for d in 0..op.ndim() {
        let corr = op.apply_direction(d, a);
        for (yi, ci) in y.iter_mut().zip(&corr) {
            *yi -= theta * dt * ci;
        }
        y = op.solve_splitting(d, &y, -theta * dt);
    }
    bc.apply_after_solving(&mut y);
    *a = y;
}

fn step_craig_sneyd(
    op: &mut dyn LinearOpComposite,
    bc: &mut BoundaryConditionSet,
    a: &mut Vec<f64>,
    t: f64,
    dt: f64,
    theta: f64,
    mu: f64,
    modified: bool,
) {
    op.set_time((t - dt).max(0.0), t);
    bc.set_time((t - dt).max(0.0));

    // predictor: Douglas pass
    let mut y = add_scaled(a, &op.apply(a), dt);
    bc.apply_after_applying(&mut y);
    let y0 = y.clone();

    for d in 0..op.ndim() {
        let corr = op.apply_direction(d, a);
        for (yi, ci) in y.iter_mut().zip(&corr) {
            *yi -= theta * dt * ci;
        }
        y = op.solve_splitting(d, &y, -theta * dt);
    }

    // corrector: re-evaluate the explicitly treated terms on the
    // predictor
    let diff = sub(&y, a);
    let mixed = op.apply_mixed(&diff);
    let mut yt = y0;
    if modified {
        let full = op.apply(&diff);
        for i in 0..yt.len() {
            yt[i] += dt * (mu * mixed[i] + (0.5 - theta) * full[i]);
        }
    } else {
        for (yi, mi) in yt.iter_mut().zip(&mixed) {
            *yi += mu * dt * mi;
        }
    }
    bc.apply_after_applying(&mut yt);

    for d in 0..op.ndim() {
        let corr = op.apply_direction(d, a);
        for (yi, ci) in yt.iter_mut().zip(&corr) {
            *yi -= theta * dt * ci;
        }
        yt = op.solve_splitting(d, &yt, -theta * dt);
    }
    bc.apply_after_solving(&mut yt);
    *a = yt;
}

fn step_hundsdorfer(
    op: &mut dyn LinearOpComposite,
    bc: &mut BoundaryConditionSet,
    a: &mut Vec<f64>,
    t: f64,
    dt: f64,
    theta: f64,
    mu: f64,
) {
    op.set_time((t - dt).max(0.0), t);
    bc.set_time((t - dt).max(0.0));

    let mut y = add_scaled(a, &op.apply(a), dt);
    bc.apply_after_applying(&mut y);
    let y0 = y.clone();

    for d in 0..op.ndim() {
        let corr = op.apply_direction(d, a);
        for (yi, ci) in y.iter_mut().zip(&corr) {
            *yi -= theta * dt * ci;
        }
        y = op.solve_splitting(d, &y, -theta * dt);
    }

    // corrector is centred on the predictor, not the previous iterate
    let diff = sub(&y, a);
    let full = op.apply(&diff);
    let mut yt = add_scaled(&y0, &full, mu * dt);
    bc.apply_after_applying(&mut yt);

    for d in 0..op.ndim() {
        let corr = op.apply_direction(d, &y);
        for (yi, ci) in yt.iter_mut().zip(&corr) {
            *yi -= theta * dt * ci;
        }
        yt = op.solve_splitting(d, &yt, -theta * dt);
    }
    bc.apply_after_solving(&mut yt);
    *a = yt;
}

fn step_implicit_euler(
    op: &mut dyn LinearOpComposite,
    bc: &mut BoundaryConditionSet,
    a: &mut Vec<f64>,
    t: f64,
    dt: f64,
) -> Result<(), FdmError> {
    op.set_time((t - dt).max(0.0), t);
    bc.set_time((t - dt).max(0.0));

    let mut rhs = a.clone();
    bc.apply_after_applying(&mut rhs);

    // solve (I - dt*A) x = rhs with the direction-split preconditioner
    let op_ref: &dyn LinearOpComposite = &*op;
    let mv = move |x: &[f64]| -> Vec<f64> {
        let ax = op_ref.apply(x);
        x.iter().zip(&ax).map(|(xi, axi)| xi - dt * axi).collect()
    };
    let pre = move |r: &[f64]| op_ref.preconditioner(r, -dt);

    let max_iter = a.len().max(10);
    let solver = BiCgStab::new(
        Box::new(mv),
        max_iter,
        IMPLICIT_EULER_TOL,
        Some(Box::new(pre)),
    );
    let result = solver.solve(&rhs, a)?;
    *a = result.x;
    bc.apply_after_solving(a);
    Ok(())
}

/// Rolls a grid backwards in time with a fixed splitting scheme,
/// honouring stopping times and step conditions.
///
/// Borrows its collaborators mutably for the duration of the sweep: one
/// solve owns all of its state exclusively.
pub struct BackwardSolver<'a> {
    op: &'a mut dyn LinearOpComposite,
    boundaries: &'a mut BoundaryConditionSet,
    conditions: &'a mut StepConditionComposite,
    scheme: SchemeDesc,
}

impl<'a> BackwardSolver<'a> {
    /// Assemble a solver around borrowed components.
    pub fn new(
        op: &'a mut dyn LinearOpComposite,
        boundaries: &'a mut BoundaryConditionSet,
        conditions: &'a mut StepConditionComposite,
        scheme: SchemeDesc,
    ) -> Self {
        Self {
            op,
            boundaries,
            conditions,
            scheme,
        }
    }

    /// Roll `rhs` from `from` down to `to`.
    ///
    /// The first `damping_steps` sub-steps use fully implicit Euler over
    /// a proportional share of the interval, suppressing oscillations
    /// from a non-smooth terminal condition; the remaining `steps` use
    /// the configured scheme. Stopping times that fall inside a step
    /// split that step so events are hit exactly. Step sizes are the
    /// caller's responsibility; no stability diagnostics run here.
    pub fn rollback(
        &mut self,
        rhs: &mut Vec<f64>,
        from: f64,
        to: f64,
        steps: usize,
        damping_steps: usize,
    ) -> Result<(), FdmError> {
        if !(from > to) {
            return Err(FdmError::InvalidConfiguration(format!(
                "rollback start {} must exceed end {}",
                from, to
            )));
        }
        if steps == 0 {
            return Err(FdmError::InvalidConfiguration(
                "rollback needs at least one time step".to_string(),
            ));
        }
        debug!(
            scheme = ?self.scheme.kind,
            steps,
            damping_steps,
            from,
            to,
            "rolling grid backwards"
        );

        if self.scheme.kind == SchemeKind::ImplicitEuler {
            // damping is indistinguishable from the main scheme here
            return self.roll_phase(
                rhs,
                from,
                to,
                steps + damping_steps,
                SchemeDesc::implicit_euler(),
                true,
            );
        }

        let all_steps = steps + damping_steps;
        let damping_to = from - (from - to) * damping_steps as f64 / all_steps as f64;
        if damping_steps > 0 {
            self.roll_phase(
                rhs,
                from,
                damping_to,
                damping_steps,
                SchemeDesc::implicit_euler(),
                true,
            )?;
        }
        self.roll_phase(
            rhs,
            damping_to,
            to,
            steps,
            self.scheme,
            damping_steps == 0,
        )
    }

    fn roll_phase(
        &mut self,
        a: &mut Vec<f64>,
        from: f64,
        to: f64,
        steps: usize,
        scheme: SchemeDesc,
        apply_at_start: bool,
    ) -> Result<(), FdmError> {
        let dt = (from - to) / steps as f64;

        if apply_at_start
            && self
                .conditions
                .stopping_times()
                .iter()
                .any(|&tp| (tp - from).abs() <= TIME_EPS)
        {
            self.conditions.apply_to(a, from);
        }

        for i in 0..steps {
            let now = from - dt * i as f64;
            let next = if i + 1 == steps {
                to
            } else {
                from - dt * (i + 1) as f64
            };

            // events inside the step are hit exactly, descending order
            let hits: Vec<f64> = self
                .conditions
                .stopping_times()
                .iter()
                .copied()
                .filter(|&tp| tp > next + TIME_EPS && tp < now - TIME_EPS)
                .collect();

            let mut current = now;
            for tp in hits {
                self.step_once(a, current, current - tp, scheme)?;
                self.conditions.apply_to(a, tp);
                current = tp;
            }
            self.step_once(a, current, current - next, scheme)?;
            self.conditions.apply_to(a, next);
        }
        Ok(())
    }

    fn step_once(
        &mut self,
        a: &mut Vec<f64>,
        t: f64,
        dt: f64,
        scheme: SchemeDesc,
    ) -> Result<(), FdmError> {
        match scheme.kind {
            SchemeKind::Douglas => {
                step_douglas(self.op, self.boundaries, a, t, dt, scheme.theta);
                Ok(())
            }
            SchemeKind::CraigSneyd => {
                step_craig_sneyd(
                    self.op,
                    self.boundaries,
                    a,
                    t,
                    dt,
                    scheme.theta,
                    scheme.mu,
                    false,
                );
                Ok(())
            }
            SchemeKind::ModifiedCraigSneyd => {
                step_craig_sneyd(
                    self.op,
                    self.boundaries,
                    a,
                    t,
                    dt,
                    scheme.theta,
                    scheme.mu,
                    true,
                );
                Ok(())
            }
            SchemeKind::Hundsdorfer => {
                step_hundsdorfer(
                    self.op,
                    self.boundaries,
                    a,
                    t,
                    dt,
                    scheme.theta,
                    scheme.mu,
                );
                Ok(())
            }
            SchemeKind::ImplicitEuler => {
                step_implicit_euler(self.op, self.boundaries, a, t, dt)
            }
        }
    }
}
