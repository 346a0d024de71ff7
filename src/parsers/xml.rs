use roxmltree::Node;

/// First child element with the given local name, any namespace.
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

pub(crate) fn child_text(node: Node, name: &str) -> Option<String> {
    child(node, name).map(inner_text)
}

/// Concatenated text of every descendant text and CDATA node.
pub(crate) fn inner_text(node: Node) -> String {
    let mut out = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            if let Some(text) = descendant.text() {
                out.push_str(text);
            }
        }
    }
    out
}
