use crate::arena::{Handle, Linked};

//=====================================================================
// Fission product yield record.
//
// One record per tabulated incident energy, chained in ascending
// energy order. The product distribution arrives fully resolved from
// the external yield reader; this crate only threads the chain and
// hands out references.
//=====================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FissionYield {
    /// Incident neutron energy in MeV.
    pub energy: f64,
    /// Product nuclides as (ZAI, independent yield) pairs.
    pub products: Vec<(i32, f64)>,
    next: Option<Handle<FissionYield>>,
    prev: Option<Handle<FissionYield>>,
}

impl FissionYield {
    pub fn new(energy: f64, products: Vec<(i32, f64)>) -> Self {
        FissionYield {
            energy,
            products,
            next: None,
            prev: None,
        }
    }
}

impl Linked for FissionYield {
    fn next(&self) -> Option<Handle<FissionYield>> {
        self.next
    }
    fn prev(&self) -> Option<Handle<FissionYield>> {
        self.prev
    }
    fn set_next(&mut self, next: Option<Handle<FissionYield>>) {
        self.next = next;
    }
    fn set_prev(&mut self, prev: Option<Handle<FissionYield>>) {
        self.prev = prev;
    }
}

impl std::fmt::Display for FissionYield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FissionYield({} MeV, {} products)",
            self.energy,
            self.products.len()
        )
    }
}
