use crate::reference::Ref;
use crate::utils::{pairing3, MyHash};

/// Inner node of the diagram. Variable `0` is reserved for the terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            variable: 0,
            low: Ref::positive(0),
            high: Ref::positive(0),
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(self.variable as u64, self.low.as_lit(), self.high.as_lit())
    }
}
