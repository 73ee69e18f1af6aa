use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;

impl Bdd {
    /// Returns one satisfying assignment for the BDD, if any exists.
    ///
    /// The assignment is a path to the `1` terminal, given as signed literals:
    /// `v` when variable `v` is true on the path, `-v` when it is false.
    /// Variables not on the path are unconstrained.
    ///
    /// Returns `None` if the BDD represents the constant false function.
    pub fn one_sat(&self, node: Ref) -> Option<Vec<i32>> {
        if self.is_zero(node) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = node;

        while !self.is_one(current) {
            let var = self.variable(current.index()) as i32;
            let high = self.high_node(current);

            if !self.is_zero(high) {
                path.push(var);
                current = high;
            } else {
                path.push(-var);
                current = self.low_node(current);
            }
        }

        Some(path)
    }

    /// Number of satisfying assignments over the variables `1..=num_vars`.
    ///
    /// The support of `node` must lie within those variables.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(1u32) << num_vars;
        self._sat_count(node, &max, &mut cache)
    }

    fn _sat_count(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.index());
        let high = self.high(node.index());

        let count_low = self._sat_count(low, max, cache);
        let count_high = self._sat_count(high, max, cache);

        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_one_sat() {
        let bdd = Bdd::new(3);

        let f = bdd.cube([1, -2, -3]);
        let model = bdd.one_sat(f);
        assert_eq!(model, Some(vec![1, -2, -3]));

        let g = bdd.apply_and(f, -bdd.cube(model.unwrap_or_default()));
        assert_eq!(bdd.one_sat(g), None);
    }

    #[test]
    fn test_one_sat_every_cube() {
        let bdd = Bdd::new(3);

        for bits in 0..8 {
            let cube: Vec<i32> = (1..=3)
                .map(|v| if bits >> (v - 1) & 1 == 1 { v } else { -v })
                .collect();
            let f = bdd.cube(cube.clone());
            assert_eq!(bdd.one_sat(f), Some(cube));
        }
    }

    #[test]
    fn test_sat_count_terminal() {
        let bdd = Bdd::new(3);

        assert_eq!(bdd.sat_count(bdd.zero, 3), BigUint::from(0u32));
        assert_eq!(bdd.sat_count(bdd.one, 0), BigUint::from(1u32));
        assert_eq!(bdd.sat_count(bdd.one, 3), BigUint::from(8u32));
    }

    #[test]
    fn test_sat_count_cube() {
        let bdd = Bdd::new(5);

        let f = bdd.cube([1, 2]);
        assert_eq!(bdd.sat_count(f, 2), BigUint::from(1u32));
        assert_eq!(bdd.sat_count(f, 3), BigUint::from(2u32));
        assert_eq!(bdd.sat_count(f, 5), BigUint::from(8u32));

        assert_eq!(bdd.sat_count(-f, 2), BigUint::from(3u32));
        assert_eq!(bdd.sat_count(-f, 4), BigUint::from(12u32));
    }

    #[test]
    fn test_sat_count_xor() {
        let bdd = Bdd::new(3);

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);
        let f = bdd.apply_xor(bdd.apply_xor(x1, x2), x3);
        assert_eq!(bdd.sat_count(f, 3), BigUint::from(4u32));
        assert_eq!(bdd.sat_count(-f, 3), BigUint::from(4u32));
    }

    #[test]
    fn test_sat_count_wide() {
        let bdd = Bdd::new(100);

        let f = bdd.mk_var(50);
        let expected = BigUint::from(1u32) << 99;
        assert_eq!(bdd.sat_count(f, 100), expected);
    }
}
