//! Human-readable rendering of a planned change

use similar::TextDiff;

use super::Change;
use crate::Result;

const RULE: &str = "--------------------------";

/// Render a change for review before it is applied.
///
/// Status patches are dumped as YAML. Full applies are shown as a unified
/// diff from the v1 document to the stored v1beta1 view.
pub fn render_change(name: &str, change: &Change) -> Result<String> {
    let (title, body) = match change {
        Change::StatusPatch { patch } => (name.to_string(), serde_yaml::to_string(patch)?),
        Change::FullApply { document, previous } => {
            let new = serde_yaml::to_string(document)?;
            let old = serde_yaml::to_string(previous)?;
            let diff = TextDiff::from_lines(&new, &old)
                .unified_diff()
                .header("v1", "v1beta1")
                .to_string();
            (format!("{} Diff", name), diff)
        }
    };

    let mut out = format!("-- {} {}\n", title, RULE);
    out.push_str(&body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(RULE);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_patch_renders_as_framed_yaml() {
        let change = Change::StatusPatch {
            patch: json!({"status": {"childReferences": [{"name": "build-2-task-abc"}]}}),
        };
        let out = render_change("build-2", &change).unwrap();

        assert!(out.starts_with("-- build-2 ---"));
        assert!(out.contains("childReferences:"));
        assert!(out.contains("name: build-2-task-abc"));
        assert!(out.ends_with(RULE));
    }

    #[test]
    fn full_apply_renders_unified_diff() {
        let change = Change::FullApply {
            document: json!({"apiVersion": "tekton.dev/v1", "kind": "TaskRun"}),
            previous: json!({"apiVersion": "tekton.dev/v1beta1", "kind": "TaskRun"}),
        };
        let out = render_change("t1", &change).unwrap();

        assert!(out.starts_with("-- t1 Diff ---"));
        assert!(out.contains("--- v1"));
        assert!(out.contains("+++ v1beta1"));
        assert!(out.contains("-apiVersion: tekton.dev/v1\n"));
        assert!(out.contains("+apiVersion: tekton.dev/v1beta1\n"));
        assert!(out.contains(" kind: TaskRun"));
    }

    #[test]
    fn identical_documents_render_empty_diff() {
        let doc = json!({"kind": "TaskRun"});
        let change = Change::FullApply {
            document: doc.clone(),
            previous: doc,
        };
        let out = render_change("t1", &change).unwrap();
        assert_eq!(out, format!("-- t1 Diff {}\n{}", RULE, RULE));
    }
}
