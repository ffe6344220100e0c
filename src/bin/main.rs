use avl_tree::AvlTree;

fn print_pre_order(tree: &AvlTree<i32>) {
    let keys: Vec<String> = tree.pre_order().map(i32::to_string).collect();
    println!("{}", keys.join(" "));
}

fn main() {
    let mut tree: AvlTree<i32> = AvlTree::new();

    for key in [10, 20, 30, 40, 50, 25] {
        tree.insert(key);
        tree.assert_invariants();
    }

    println!("AVL tree after insertions:");
    print_pre_order(&tree);

    tree.remove(&20);
    tree.assert_invariants();

    println!();
    println!("AVL tree after removing 20:");
    print_pre_order(&tree);

    let key = 30;
    println!();
    match tree.get(&key) {
        Some(node) => println!(
            "node {key} is at the root of a subtree of height {}",
            node.height()
        ),
        None => println!("node {key} is not in the tree"),
    }

    drop(tree);
}
