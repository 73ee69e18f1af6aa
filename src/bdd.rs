//! Reference BDD manager used as the bundled benchmark backend.
//!
//! A reduced ordered BDD with complement edges: every function is a [`Ref`] into a shared
//! unique table, and the sign of the reference marks negation. Variables are 1-indexed,
//! with `0` reserved for the terminal node, and smaller indices lie closer to the root.
//!
//! There is no garbage collection and no reordering. Nodes live as long as the manager,
//! and a full table is a fatal error.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::utils::{pairing2, pairing3, MyHash};

type Storage = Table<Node>;

impl Storage {
    pub fn variable(&self, index: usize) -> u32 {
        self.value(index).variable
    }
    pub fn low(&self, index: usize) -> Ref {
        self.value(index).low
    }
    pub fn high(&self, index: usize) -> Ref {
        self.value(index).high
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
    Exists(Ref, Ref),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match *self {
            OpKey::Ite(f, g, h) => pairing2(pairing3(f.as_lit(), g.as_lit(), h.as_lit()), 0),
            OpKey::Exists(f, cube) => pairing2(pairing2(f.as_lit(), cube.as_lit()), 1),
        }
    }
}

/// Sizing of a [`Bdd`] manager.
#[derive(Debug, Clone)]
pub struct BddConfig {
    /// The unique table holds at most `2^storage_bits` nodes.
    pub storage_bits: usize,
    /// The computed table has `2^cache_bits` slots; older results are overwritten.
    pub cache_bits: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            storage_bits: 24,
            cache_bits: 16,
        }
    }
}

impl BddConfig {
    pub fn with_storage_bits(mut self, storage_bits: usize) -> Self {
        self.storage_bits = storage_bits;
        self
    }

    pub fn with_cache_bits(mut self, cache_bits: usize) -> Self {
        self.cache_bits = cache_bits;
        self
    }
}

pub struct Bdd {
    storage: RefCell<Storage>,
    cache: RefCell<Cache<OpKey, Ref>>,
    num_vars: u32,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    /// Create a manager for variables `1..=num_vars`.
    pub fn new(num_vars: usize) -> Self {
        Self::with_config(num_vars, BddConfig::default())
    }

    pub fn with_config(num_vars: usize, config: BddConfig) -> Self {
        assert!(
            config.storage_bits <= 31,
            "Storage bits should be in the range 0..=31"
        );
        assert!(num_vars < i32::MAX as usize, "Too many variables");

        let mut storage = Storage::new(config.storage_bits);

        // Allocate the terminal node:
        let one = storage.alloc(Node::default());
        assert_eq!(one, 1); // Make sure the terminal node is (1).
        let one = Ref::positive(one as u32);
        let zero = -one;

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(config.cache_bits)),
            num_vars: num_vars as u32,
            zero,
            one,
        }
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Bdd")
            .field("num_vars", &self.num_vars)
            .field("capacity", &storage.capacity())
            .field("size", &storage.size())
            .finish()
    }
}

impl Bdd {
    pub fn num_vars(&self) -> usize {
        self.num_vars as usize
    }

    /// Number of nodes allocated so far (including the terminal).
    pub fn allocated_nodes(&self) -> usize {
        self.storage.borrow().size()
    }

    pub fn cache(&self) -> std::cell::Ref<'_, Cache<OpKey, Ref>> {
        self.cache.borrow()
    }

    pub fn variable(&self, index: usize) -> u32 {
        self.storage.borrow().variable(index)
    }
    pub fn low(&self, index: usize) -> Ref {
        self.storage.borrow().low(index)
    }
    pub fn high(&self, index: usize) -> Ref {
        self.storage.borrow().high(index)
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        assert_ne!(v, 0, "Variable index should not be zero");
        assert!(v <= self.num_vars, "Variable {} is out of range", v);

        // Handle canonicity
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            return low;
        }

        let i = self.storage.borrow_mut().put(Node {
            variable: v,
            low,
            high,
        });
        Ref::positive(i as u32)
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        self.mk_node(v, self.zero, self.one)
    }

    /// Conjunction of the given literals (positive for `x`, negative for `~x`).
    pub fn cube(&self, literals: impl IntoIterator<Item = i32>) -> Ref {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_by_key(|&v| std::cmp::Reverse(v.abs()));
        let mut current = self.one;
        for lit in literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            current = if lit < 0 {
                self.mk_node(lit.unsigned_abs(), current, self.zero)
            } else {
                self.mk_node(lit as u32, self.zero, current)
            };
        }
        current
    }

    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        if self.is_terminal(node) || v < self.variable(node.index()) {
            return (node, node);
        }
        assert_eq!(v, self.variable(node.index()));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        let i = self.variable(f.index());
        let j = self.variable(g.index());
        let k = self.variable(h.index());
        assert_ne!(i, 0);

        // Equivalent pairs:
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        //   ite(F,G,1) == ite(~G,~F,1) == F -> G
        //   ite(F,0,H) == ite(~H,0,~F) == ~F ∧ H
        //   ite(F,G,~G) == ite(G,F,~F)
        // (choose the one with the lowest variable)
        if self.is_one(g) && k < i {
            assert_ne!(k, 0);
            return self.apply_ite(h, self.one, f);
        }
        if self.is_zero(h) && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(g, f, self.zero);
        }
        if self.is_one(h) && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(-g, -f, self.one);
        }
        if self.is_zero(g) && k < i {
            assert_ne!(k, 0);
            return self.apply_ite(-h, self.zero, -f);
        }
        if g == -h && j < i {
            assert_ne!(j, 0);
            return self.apply_ite(g, f, -f);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return if n { -res } else { res };
        }

        // Determine the top variable:
        let m = [f, g, h]
            .into_iter()
            .filter(|&x| !self.is_terminal(x))
            .map(|x| self.variable(x.index()))
            .min()
            .expect("f is not terminal");

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(m, e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_imply(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.one)
    }

    pub fn apply_diff(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, self.zero)
    }

    /// Existential quantification of all variables in the positive `cube`.
    pub fn exists_cube(&self, f: Ref, cube: Ref) -> Ref {
        debug!("exists_cube(f = {}, cube = {})", f, cube);

        if self.is_terminal(f) || self.is_one(cube) {
            return f;
        }

        let v = self.variable(f.index());

        // Skip the quantified variables above the top of f.
        let mut cube = cube;
        while !self.is_one(cube) && self.variable(cube.index()) < v {
            cube = self.high_node(cube);
        }
        if self.is_one(cube) {
            return f;
        }

        let key = OpKey::Exists(f, cube);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return res;
        }

        let (f0, f1) = self.top_cofactors(f, v);
        let res = if self.variable(cube.index()) == v {
            let rest = self.high_node(cube);
            let e0 = self.exists_cube(f0, rest);
            if self.is_one(e0) {
                self.one
            } else {
                let e1 = self.exists_cube(f1, rest);
                self.apply_or(e0, e1)
            }
        } else {
            let e0 = self.exists_cube(f0, cube);
            let e1 = self.exists_cube(f1, cube);
            self.mk_node(v, e0, e1)
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Universal quantification of all variables in the positive `cube`.
    pub fn forall_cube(&self, f: Ref, cube: Ref) -> Ref {
        -self.exists_cube(-f, cube)
    }

    /// Indices of all nodes reachable from the given roots (the terminal included).
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<usize> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    /// Number of nodes in the diagram, counting each of the two terminals once.
    pub fn size(&self, f: Ref) -> u64 {
        let inner = self.descendants([f]).len() as u64 - 1;
        if inner == 0 {
            1
        } else {
            inner + 2
        }
    }

    /// Evaluate `f` under the assignment, where `assignment[i]` is the value of variable `i + 1`.
    pub fn evaluate(&self, f: Ref, assignment: &[bool]) -> bool {
        let mut current = f;
        while !self.is_terminal(current) {
            let v = self.variable(current.index()) as usize;
            current = if assignment[v - 1] {
                self.high_node(current)
            } else {
                self.low_node(current)
            };
        }
        self.is_one(current)
    }
}
