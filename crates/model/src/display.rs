use std::fmt::Write;

use crate::batch::Batch;
use crate::sampling_ratio::is_sampling_ratio_computed;

/// Multi-line dump of a batch tree, one batch per line.
pub fn render_tree(batch: &Batch) -> String {
    let mut out = String::new();
    render_into(&mut out, batch, "", "");
    out
}

/// Emit [`render_tree`] through `tracing` at trace level.
pub fn log_tree(batch: &Batch) {
    for line in render_tree(batch).lines() {
        tracing::trace!("{line}");
    }
}

fn render_into(out: &mut String, batch: &Batch, indent: &str, next_indent: &str) {
    let label = if batch.has_label() { batch.label() } else { "NO_LABEL" };
    let mut line = format!("{indent}{label}");
    if let Some(id) = batch.id {
        let _ = write!(line, " id:{id}");
    }
    if let Some(parent_id) = batch.parent_id {
        let _ = write!(line, " parentId:{parent_id}");
    }
    if let Some(group) = batch.taxon_group.as_ref().filter(|t| !t.is_empty()) {
        let _ = write!(line, " taxonGroup:{}", group.display());
    }
    if let Some(name) = batch.taxon_name.as_ref().filter(|t| !t.is_empty()) {
        let _ = write!(line, " taxonName:{}", name.display());
    }
    if let Some(count) = batch.individual_count {
        let _ = write!(line, " individualCount:{count}");
    }
    if let Some(weight) = &batch.weight
        && let Some(value) = weight.value()
    {
        let marker = if weight.computed { "~" } else { "" };
        let _ = write!(line, " weight:{marker}{value}kg");
    }
    if batch.is_sampling_batch()
        && let Some(ratio) = batch.sampling_ratio
    {
        let text = batch.sampling_ratio_text.as_deref().unwrap_or_default();
        let marker = if is_sampling_ratio_computed(text, None) { "~" } else { "" };
        let _ = write!(line, " samplingRatio:{marker}{ratio} ({text})");
    }
    out.push_str(&line);
    out.push('\n');

    let count = batch.children.len();
    for (index, child) in batch.children.iter().enumerate() {
        if index + 1 == count {
            render_into(out, child, &format!("{next_indent} \\- "), &format!("{next_indent}    "));
        } else {
            render_into(out, child, &format!("{next_indent} |- "), &format!("{next_indent} |  "));
        }
    }
}
