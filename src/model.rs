use std::{collections::BTreeSet, prelude::v1::*};

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::AvlTree;

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Get(ItemValue),
    Remove(ItemValue),
    Clear,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Get(item) => FinalOp::Get(get_value(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(sorted, item)),
            Op::Clear => FinalOp::Clear,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Get(u32),
    Remove(u32),
    Clear,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    // Clearing throws away the whole tree, so keep it rare.
    proptest::prop_oneof![
        8 => value_strategy().prop_map(Op::Insert),
        4 => value_strategy().prop_map(Op::Get),
        6 => value_strategy().prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

/// Replays `ops` against both an [`AvlTree`] and a `BTreeSet`, checking after every step that
/// they hold the same keys and that the tree is balanced.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());
    let mut btree = BTreeSet::new();
    let mut avl: AvlTree<u32> = AvlTree::new();

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        if let Err(idx) = v.binary_search(&value) {
            v.insert(idx, value);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) {
        if let Ok(idx) = v.binary_search(&value) {
            v.remove(idx);
        }
    }

    let mut final_ops = Vec::with_capacity(ops.len());
    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);
        final_ops.push(final_op);

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);

                let from_btree = btree.insert(value);
                let from_avl = avl.insert(value);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Get(value) => {
                let from_btree = btree.get(&value);
                let from_avl = avl.get(&value).map(|node| node.key());

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(value) => {
                remove_sorted(&mut sorted_values, value);

                let from_btree = btree.take(&value);
                let from_avl = avl.take(&value);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Clear => {
                sorted_values.clear();
                btree.clear();
                avl.clear();
            }
        }

        avl.assert_invariants();
        assert_eq!(btree.len(), avl.len());

        // An AVL tree with `n` nodes is less than `1.45 * log2(n + 2)` high.
        let bound = 1.45 * ((avl.len() + 2) as f64).log2();
        assert!(
            f64::from(avl.height()) < bound,
            "height {} exceeds bound for {} nodes",
            avl.height(),
            avl.len()
        );

        let mut keys: Vec<u32> = avl.pre_order().copied().collect();
        keys.sort_unstable();
        assert!(btree.iter().eq(keys.iter()), "{final_ops:?}");
    }
}
