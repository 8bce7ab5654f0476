use crate::error_handler::{default_error_handler, Error};
use crate::math::{Real, Vector, DIM};

/// One fully-formed constraint row, as consumed by an external iterative solver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstraintRow {
    /// The linear Jacobian of body A. The external solver derives body B's
    /// linear part by negation.
    pub j1_linear: Vector,
    /// The angular Jacobian of body A.
    pub j1_angular: Vector,
    /// The linear Jacobian of body B.
    pub j2_linear: Vector,
    /// The angular Jacobian of body B.
    pub j2_angular: Vector,
    /// The right-hand-side error term of this row.
    pub rhs: Real,
    /// The constraint-force-mixing (softening) term of this row.
    pub cfm: Real,
    /// The lower impulse bound of this row.
    pub lower_limit: Real,
    /// The upper impulse bound of this row.
    pub upper_limit: Real,
}

impl Default for ConstraintRow {
    fn default() -> Self {
        Self {
            j1_linear: na::zero(),
            j1_angular: na::zero(),
            j2_linear: na::zero(),
            j2_angular: na::zero(),
            rhs: 0.0,
            cfm: 0.0,
            lower_limit: -Real::MAX,
            upper_limit: Real::MAX,
        }
    }
}

/// The number of rows a constraint wants to emit for the current step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowCount {
    /// The total number of constraint rows.
    pub rows: usize,
    /// The number of leading bilateral ("nub") rows, i.e. rows whose impulse
    /// is unbounded on both sides.
    pub nub: usize,
}

/// A fixed-capacity buffer of constraint rows handed to an external solver.
///
/// The Jacobian components are kept in flat arrays addressed by
/// `row * rowskip + component` so the buffer can mirror the memory layout of
/// an ODE-style solver; the per-row scalars (rhs, cfm, impulse bounds) are
/// indexed by row directly. [`ConstraintRow`] values are the typed view over
/// this storage.
#[derive(Clone, Debug)]
pub struct ConstraintRows {
    rowskip: usize,
    capacity: usize,
    len: usize,
    j1_linear: Vec<Real>,
    j1_angular: Vec<Real>,
    j2_linear: Vec<Real>,
    j2_angular: Vec<Real>,
    rhs: Vec<Real>,
    cfm: Vec<Real>,
    lower_limit: Vec<Real>,
    upper_limit: Vec<Real>,
}

impl ConstraintRows {
    /// A buffer able to hold `capacity` rows, with the tightest stride (`rowskip == 3`).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_layout(capacity, DIM)
    }

    /// A buffer able to hold `capacity` rows, with `rowskip` scalar slots per
    /// row in each Jacobian array. `rowskip` must be at least 3.
    pub fn with_layout(capacity: usize, rowskip: usize) -> Self {
        assert!(rowskip >= DIM, "rowskip must leave room for 3 components");
        Self {
            rowskip,
            capacity,
            len: 0,
            j1_linear: vec![0.0; capacity * rowskip],
            j1_angular: vec![0.0; capacity * rowskip],
            j2_linear: vec![0.0; capacity * rowskip],
            j2_angular: vec![0.0; capacity * rowskip],
            rhs: vec![0.0; capacity],
            cfm: vec![0.0; capacity],
            lower_limit: vec![0.0; capacity],
            upper_limit: vec![0.0; capacity],
        }
    }

    /// The stride, in scalars, between two consecutive rows of the flat
    /// Jacobian arrays.
    #[inline]
    pub fn rowskip(&self) -> usize {
        self.rowskip
    }

    /// The number of rows this buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of rows currently in this buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is this buffer empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every row, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.len = 0;
        for buf in [
            &mut self.j1_linear,
            &mut self.j1_angular,
            &mut self.j2_linear,
            &mut self.j2_angular,
        ] {
            buf.fill(0.0);
        }
        self.rhs.fill(0.0);
        self.cfm.fill(0.0);
        self.lower_limit.fill(0.0);
        self.upper_limit.fill(0.0);
    }

    /// Appends one row. Reports through the global error handler (which panics
    /// by default) if the buffer is already full.
    pub fn push(&mut self, row: ConstraintRow) {
        if self.len == self.capacity {
            let handler = default_error_handler();
            handler(Error::RowBufferCapacity(format!(
                "cannot push row {}: the buffer holds at most {} rows",
                self.len + 1,
                self.capacity
            )));
            return;
        }

        let i = self.len;
        let srow = i * self.rowskip;
        for k in 0..DIM {
            self.j1_linear[srow + k] = row.j1_linear[k];
            self.j1_angular[srow + k] = row.j1_angular[k];
            self.j2_linear[srow + k] = row.j2_linear[k];
            self.j2_angular[srow + k] = row.j2_angular[k];
        }
        self.rhs[i] = row.rhs;
        self.cfm[i] = row.cfm;
        self.lower_limit[i] = row.lower_limit;
        self.upper_limit[i] = row.upper_limit;
        self.len = i + 1;
    }

    /// The typed view of the `i`-th row.
    pub fn row(&self, i: usize) -> ConstraintRow {
        assert!(i < self.len);
        let srow = i * self.rowskip;
        let read = |buf: &[Real]| Vector::new(buf[srow], buf[srow + 1], buf[srow + 2]);
        ConstraintRow {
            j1_linear: read(&self.j1_linear),
            j1_angular: read(&self.j1_angular),
            j2_linear: read(&self.j2_linear),
            j2_angular: read(&self.j2_angular),
            rhs: self.rhs[i],
            cfm: self.cfm[i],
            lower_limit: self.lower_limit[i],
            upper_limit: self.upper_limit[i],
        }
    }

    /// The flat body-A linear Jacobian array, strided by [`rowskip`](Self::rowskip).
    pub fn j1_linear_raw(&self) -> &[Real] {
        &self.j1_linear
    }

    /// The flat body-A angular Jacobian array, strided by [`rowskip`](Self::rowskip).
    pub fn j1_angular_raw(&self) -> &[Real] {
        &self.j1_angular
    }

    /// The flat body-B linear Jacobian array, strided by [`rowskip`](Self::rowskip).
    pub fn j2_linear_raw(&self) -> &[Real] {
        &self.j2_linear
    }

    /// The flat body-B angular Jacobian array, strided by [`rowskip`](Self::rowskip).
    pub fn j2_angular_raw(&self) -> &[Real] {
        &self.j2_angular
    }

    /// The per-row right-hand-side error terms.
    pub fn rhs_raw(&self) -> &[Real] {
        &self.rhs
    }

    /// The per-row constraint-force-mixing terms.
    pub fn cfm_raw(&self) -> &[Real] {
        &self.cfm
    }

    /// The per-row lower impulse bounds.
    pub fn lower_limit_raw(&self) -> &[Real] {
        &self.lower_limit
    }

    /// The per-row upper impulse bounds.
    pub fn upper_limit_raw(&self) -> &[Real] {
        &self.upper_limit
    }
}
