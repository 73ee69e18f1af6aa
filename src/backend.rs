//! [`DiagramManager`] implementation for the bundled [`Bdd`].

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::manager::DiagramManager;
use crate::reference::Ref;

/// Contract variable `i` is backend variable `i + 1`.
fn var(i: usize) -> u32 {
    (i + 1) as u32
}

impl DiagramManager for Bdd {
    type Dd = Ref;

    const NAME: &'static str = "bdd-rs";

    fn new(varcount: usize) -> Self {
        Bdd::new(varcount)
    }

    fn varcount(&self) -> usize {
        self.num_vars()
    }

    fn top(&self) -> Ref {
        self.one
    }

    fn bot(&self) -> Ref {
        self.zero
    }

    fn ithvar(&self, i: usize) -> Ref {
        self.mk_var(var(i))
    }

    fn ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        self.apply_ite(f, g, h)
    }

    fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    fn apply_and(&self, f: Ref, g: Ref) -> Ref {
        Bdd::apply_and(self, f, g)
    }

    fn apply_or(&self, f: Ref, g: Ref) -> Ref {
        Bdd::apply_or(self, f, g)
    }

    fn apply_xor(&self, f: Ref, g: Ref) -> Ref {
        Bdd::apply_xor(self, f, g)
    }

    fn apply_xnor(&self, f: Ref, g: Ref) -> Ref {
        self.apply_eq(f, g)
    }

    fn apply_diff(&self, f: Ref, g: Ref) -> Ref {
        Bdd::apply_diff(self, f, g)
    }

    fn apply_imp(&self, f: Ref, g: Ref) -> Ref {
        self.apply_imply(f, g)
    }

    fn exists_all<I>(&self, f: Ref, vars: I) -> Ref
    where
        I: IntoIterator<Item = usize>,
    {
        let cube = self.cube(vars.into_iter().map(|i| var(i) as i32));
        self.exists_cube(f, cube)
    }

    fn nodecount(&self, f: Ref) -> u64 {
        self.size(f)
    }

    fn satcount_over(&self, f: Ref, active: usize) -> BigUint {
        let n = self.num_vars();
        assert!(active <= n, "active variables exceed varcount");
        self.sat_count(f, n) >> (n - active)
    }

    fn make_node(&self, i: usize, low: Ref, high: Ref) -> Ref {
        self.mk_node(var(i), low, high)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_literals() {
        let mgr = <Bdd as DiagramManager>::new(2);

        let x0 = mgr.ithvar(0);
        assert_eq!(mgr.variable(x0.index()), 1);
        assert_eq!(mgr.nithvar(0), -x0);
        assert_eq!(mgr.nodecount(x0), 3);
        assert_eq!(mgr.nodecount(mgr.top()), 1);
    }

    #[test]
    fn test_truth_tables() {
        let mgr = <Bdd as DiagramManager>::new(2);

        let f = mgr.ithvar(0);
        let g = mgr.ithvar(1);
        let ops: [(fn(bool, bool) -> bool, Ref); 6] = [
            (|a, b| a && b, DiagramManager::apply_and(&mgr, f, g)),
            (|a, b| a || b, DiagramManager::apply_or(&mgr, f, g)),
            (|a, b| a ^ b, DiagramManager::apply_xor(&mgr, f, g)),
            (|a, b| a == b, DiagramManager::apply_xnor(&mgr, f, g)),
            (|a, b| a && !b, DiagramManager::apply_diff(&mgr, f, g)),
            (|a, b| !a || b, DiagramManager::apply_imp(&mgr, f, g)),
        ];
        for (op, dd) in ops {
            for bits in 0..4u32 {
                let a = bits & 1 == 1;
                let b = bits & 2 == 2;
                assert_eq!(mgr.evaluate(dd, &[a, b]), op(a, b));
            }
        }
    }

    #[test]
    fn test_exists_all_ignores_order() {
        let mgr = <Bdd as DiagramManager>::new(4);

        let f = mgr.apply_and(mgr.apply_and(mgr.ithvar(0), mgr.ithvar(2)), mgr.ithvar(3));
        assert_eq!(mgr.exists_all(f, [3, 0]), mgr.ithvar(2));
        assert_eq!(mgr.exists_all(f, []), f);
    }

    #[test]
    fn test_satcount_divides_out_inactive() {
        let mgr = <Bdd as DiagramManager>::new(10);

        let f = mgr.apply_xor(mgr.ithvar(0), mgr.ithvar(1));
        assert_eq!(mgr.satcount(f), BigUint::from(512u32));
        assert_eq!(mgr.satcount_over(f, 2), BigUint::from(2u32));
        assert_eq!(mgr.satcount_over(mgr.bot(), 2), BigUint::ZERO);
    }
}
