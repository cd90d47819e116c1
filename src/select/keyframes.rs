use crate::document::source::KeyframeNode;
use crate::foundation::core::FrameIndex;

/// Whether `root`, or any descendant reachable through visible nodes only, has a keyframe at
/// exactly `frame`.
///
/// The root itself is tested regardless of its own visibility; below it, an invisible node hides
/// its whole subtree.
pub fn has_visible_keyframe_at<N: KeyframeNode>(root: &N, frame: FrameIndex) -> bool {
    let mut stack: Vec<&N> = Vec::with_capacity(16);
    stack.push(root);

    while let Some(node) = stack.pop() {
        if node.has_keyframe_at(frame) {
            return true;
        }
        stack.extend(node.children().filter(|c| c.is_visible()));
    }
    false
}

#[cfg(test)]
#[path = "../../tests/unit/select/keyframes.rs"]
mod tests;
