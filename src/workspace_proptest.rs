#![cfg(test)]

// Property tests for Workspace kept inside the crate so they can observe
// constructor and destructor calls through a per-case recorder.

use crate::key::{Keyed, Plain};
use crate::{FromArgs, Workspace};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct Recorder {
    constructed: RefCell<Vec<u32>>,
    destroyed: RefCell<Vec<u32>>,
}

// Object tagged with the order in which it was constructed.
struct Scratch {
    seq: u32,
    fill: i64,
    rec: Rc<Recorder>,
}

impl FromArgs<(u16, i64, Rc<Recorder>)> for Scratch {
    fn from_args((_size, fill, rec): (u16, i64, Rc<Recorder>)) -> Self {
        let seq = rec.constructed.borrow().len() as u32;
        rec.constructed.borrow_mut().push(seq);
        Scratch { seq, fill, rec }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        self.rec.destroyed.borrow_mut().push(self.seq);
    }
}

#[derive(Clone, Debug)]
struct Request {
    name: usize,
    size: u16,
    fill: i64,
}

fn arb_requests() -> impl Strategy<Value = Vec<Request>> {
    let req = (0usize..4, 0u16..4, any::<i64>()).prop_map(|(name, size, fill)| Request {
        name,
        size,
        fill,
    });
    proptest::collection::vec(req, 0..64)
}

const NAMES: [&str; 4] = ["grad", "dir", "tmp", "hess"];

// Property: request sequences agree with a model keyed by (name, size).
// Invariants exercised across random sequences:
// - Construction runs exactly once per distinct (name, keyed size).
// - A hit returns the first object; the fill passed on later calls is ignored.
// - `len` equals the number of distinct keys seen so far.
// - Dropping the workspace destroys every object once, in reverse creation order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_requests_match_model(reqs in arb_requests()) {
        let rec = Rc::new(Recorder::default());
        let mut model: HashMap<(usize, u16), (u32, i64)> = HashMap::new();
        {
            let mut ws = Workspace::new();
            for r in &reqs {
                let next = model.len() as u32;
                let expected = *model.entry((r.name, r.size)).or_insert((next, r.fill));
                let got: &mut Scratch = ws
                    .get(NAMES[r.name], (Keyed(r.size), r.fill, Plain(rec.clone())))
                    .unwrap();
                prop_assert_eq!((got.seq, got.fill), expected);
                prop_assert_eq!(ws.len(), model.len());
                prop_assert_eq!(rec.constructed.borrow().len(), model.len());
            }
            prop_assert!(rec.destroyed.borrow().is_empty());
        }
        let destroyed = rec.destroyed.borrow().clone();
        let want: Vec<u32> = (0..model.len() as u32).rev().collect();
        prop_assert_eq!(destroyed, want);
    }

    // Property: only keyed arguments affect identity, regardless of plain values.
    #[test]
    fn prop_plain_arguments_never_split_keys(fills in proptest::collection::vec(any::<i64>(), 1..16)) {
        let rec = Rc::new(Recorder::default());
        let mut ws = Workspace::new();
        for fill in &fills {
            let got: &mut Scratch = ws
                .get("tmp", (Keyed(1_u16), *fill, Plain(rec.clone())))
                .unwrap();
            prop_assert_eq!(got.fill, fills[0]);
        }
        prop_assert_eq!(ws.len(), 1);
        prop_assert_eq!(rec.constructed.borrow().len(), 1);
    }
}
