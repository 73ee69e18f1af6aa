//! Capability set a decision diagram backend exposes to the workloads.
//!
//! Variables are 0-based at this boundary. A backend is free to renumber them
//! internally (the bundled [`Bdd`][crate::bdd::Bdd] shifts them by one).
//!
//! Nodes can be created in two ways: through the Boolean combinators, or bottom-up
//! through a [`NodeBuilder`] session. The session borrows the manager mutably,
//! so at most one construction is in flight per manager.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use num_bigint::BigUint;

use crate::error::{Error, Result};

pub trait DiagramManager {
    /// Handle to a function owned by the manager.
    type Dd: Copy + Eq + Hash + Debug;

    /// Human-readable backend name.
    const NAME: &'static str;

    /// Create a manager over variables `0..varcount`.
    fn new(varcount: usize) -> Self
    where
        Self: Sized;

    fn varcount(&self) -> usize;

    fn top(&self) -> Self::Dd;
    fn bot(&self) -> Self::Dd;

    fn ithvar(&self, i: usize) -> Self::Dd;
    fn nithvar(&self, i: usize) -> Self::Dd {
        self.apply_not(self.ithvar(i))
    }

    fn ite(&self, f: Self::Dd, g: Self::Dd, h: Self::Dd) -> Self::Dd;

    fn apply_not(&self, f: Self::Dd) -> Self::Dd;
    fn apply_and(&self, f: Self::Dd, g: Self::Dd) -> Self::Dd;
    fn apply_or(&self, f: Self::Dd, g: Self::Dd) -> Self::Dd;
    fn apply_xor(&self, f: Self::Dd, g: Self::Dd) -> Self::Dd;
    fn apply_xnor(&self, f: Self::Dd, g: Self::Dd) -> Self::Dd {
        self.apply_not(self.apply_xor(f, g))
    }
    /// `f ∧ ¬g`
    fn apply_diff(&self, f: Self::Dd, g: Self::Dd) -> Self::Dd {
        self.apply_and(f, self.apply_not(g))
    }
    /// `f ⇒ g`
    fn apply_imp(&self, f: Self::Dd, g: Self::Dd) -> Self::Dd {
        self.apply_or(self.apply_not(f), g)
    }

    /// Existentially quantify every listed variable.
    fn exists_all<I>(&self, f: Self::Dd, vars: I) -> Self::Dd
    where
        I: IntoIterator<Item = usize>;

    fn exists(&self, f: Self::Dd, i: usize) -> Self::Dd {
        self.exists_all(f, [i])
    }

    /// Existentially quantify every variable satisfying `pred`.
    fn exists_by<P>(&self, f: Self::Dd, pred: P) -> Self::Dd
    where
        P: Fn(usize) -> bool,
    {
        self.exists_all(f, (0..self.varcount()).filter(|&i| pred(i)))
    }

    fn forall_all<I>(&self, f: Self::Dd, vars: I) -> Self::Dd
    where
        I: IntoIterator<Item = usize>,
    {
        self.apply_not(self.exists_all(self.apply_not(f), vars))
    }

    fn forall(&self, f: Self::Dd, i: usize) -> Self::Dd {
        self.forall_all(f, [i])
    }

    fn forall_by<P>(&self, f: Self::Dd, pred: P) -> Self::Dd
    where
        P: Fn(usize) -> bool,
    {
        self.forall_all(f, (0..self.varcount()).filter(|&i| pred(i)))
    }

    /// Number of nodes, counting each terminal exactly once.
    fn nodecount(&self, f: Self::Dd) -> u64;

    /// Number of satisfying assignments when only `active` variables are counted.
    ///
    /// `f` must not depend on more than `active` variables: the other
    /// `varcount - active` are don't-care and divided out of the count.
    fn satcount_over(&self, f: Self::Dd, active: usize) -> BigUint;

    fn satcount(&self, f: Self::Dd) -> BigUint {
        self.satcount_over(f, self.varcount())
    }

    /// Raw node constructor used by [`NodeBuilder`].
    ///
    /// `low` and `high` must only depend on variables strictly larger than `var`.
    fn make_node(&self, var: usize, low: Self::Dd, high: Self::Dd) -> Self::Dd;

    /// Open a bottom-up construction session.
    fn builder(&mut self) -> NodeBuilder<'_, Self>
    where
        Self: Sized,
    {
        NodeBuilder::new(self)
    }
}

/// Node produced inside a [`NodeBuilder`] session.
///
/// Only usable as a child within the session that created it.
#[derive(Debug)]
pub struct BuildNode<'m, D> {
    dd: D,
    level: Option<usize>,
    _session: PhantomData<&'m ()>,
}

impl<D: Copy> Clone for BuildNode<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Copy> Copy for BuildNode<'_, D> {}

impl<D: Copy> BuildNode<'_, D> {
    pub fn dd(&self) -> D {
        self.dd
    }

    /// Variable this node was built at, `None` for terminals.
    pub fn level(&self) -> Option<usize> {
        self.level
    }
}

/// Append-only bottom-up construction session.
///
/// Nodes must be created leaves-first: every call to [`node`][Self::node] uses a
/// variable no larger than the previous one, and both children must have been built
/// at strictly larger variables (or be terminals).
pub struct NodeBuilder<'m, M: DiagramManager> {
    mgr: &'m mut M,
    last_var: Option<usize>,
    latest: Option<M::Dd>,
}

impl<'m, M: DiagramManager> NodeBuilder<'m, M> {
    fn new(mgr: &'m mut M) -> Self {
        Self {
            mgr,
            last_var: None,
            latest: None,
        }
    }

    pub fn manager(&self) -> &M {
        &*self.mgr
    }

    /// Terminal node.
    pub fn leaf(&mut self, value: bool) -> BuildNode<'m, M::Dd> {
        let dd = if value { self.mgr.top() } else { self.mgr.bot() };
        if self.latest.is_none() {
            self.latest = Some(dd);
        }
        BuildNode {
            dd,
            level: None,
            _session: PhantomData,
        }
    }

    /// Node `ite(var, high, low)`.
    pub fn node(
        &mut self,
        var: usize,
        low: BuildNode<'m, M::Dd>,
        high: BuildNode<'m, M::Dd>,
    ) -> Result<BuildNode<'m, M::Dd>> {
        let varcount = self.mgr.varcount();
        if var >= varcount {
            return Err(Error::VariableOutOfRange { var, varcount });
        }
        if let Some(last) = self.last_var {
            if var > last {
                return Err(Error::BuildOrder { var, last });
            }
        }
        for child in [low, high] {
            if let Some(level) = child.level {
                if level <= var {
                    return Err(Error::BuildChild { var, child: level });
                }
            }
        }

        let dd = self.mgr.make_node(var, low.dd, high.dd);
        self.last_var = Some(var);
        self.latest = Some(dd);
        Ok(BuildNode {
            dd,
            level: Some(var),
            _session: PhantomData,
        })
    }

    /// Node at `var` that does not depend on it.
    pub fn dont_care(&mut self, var: usize, child: BuildNode<'m, M::Dd>) -> Result<BuildNode<'m, M::Dd>> {
        self.node(var, child, child)
    }

    /// Finish the session and return the most recently built node.
    pub fn build(self) -> Result<M::Dd> {
        self.latest.ok_or(Error::EmptyBuild)
    }
}
