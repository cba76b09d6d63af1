//! Plain-text rendering of view models.
//!
//! The renderer is a pure function from [`ViewModel`] to a `String`, so the
//! CLI prints it and tests compare it directly.
//!
//! ```text
//!   Products
//!   3 items available
//!   🔍 bag
//!   [All 20] [electronics 6] [*jewelery 4*] ...        (clear filters)
//!   > #1   Fjallraven Backpack           $109.95   ⭐ 3.9
//!     #5   Gold Ring                     $168.00   ⭐ 4.6
//! ```

use crate::ui::helpers::truncate;
use crate::ui::viewmodel::{DetailViewModel, ListViewModel, ViewModel};
use std::fmt::Write;

const TITLE_WIDTH: usize = 40;

/// Renders a frame as text lines.
#[must_use]
pub fn render(vm: &ViewModel) -> String {
    let mut out = String::new();
    match vm {
        ViewModel::List(list) => render_list(&mut out, list),
        ViewModel::Detail(detail) => render_detail(&mut out, detail),
    }
    out
}

// Writing into a String cannot fail.
fn render_list(out: &mut String, vm: &ListViewModel) {
    let _ = writeln!(out, "{}", vm.header.title);
    let _ = writeln!(out, "{}", vm.header.subtitle);

    if let Some(error) = &vm.error {
        let _ = writeln!(out);
        let _ = writeln!(out, "⚠️  {}", error.title);
        let _ = writeln!(out, "{}", error.message);
        let _ = writeln!(out, "[{}]", error.action_label);
        return;
    }

    if vm.search_bar.query.is_empty() {
        let _ = writeln!(out, "🔍 {}", vm.search_bar.placeholder);
    } else {
        let _ = writeln!(out, "🔍 {}", vm.search_bar.query);
    }

    if !vm.chips.is_empty() {
        let chips: Vec<String> = vm
            .chips
            .iter()
            .map(|chip| {
                if chip.is_active {
                    format!("[*{} {}*]", chip.label, chip.count)
                } else {
                    format!("[{} {}]", chip.label, chip.count)
                }
            })
            .collect();
        let _ = write!(out, "{}", chips.join(" "));
        if vm.show_clear_filters {
            let _ = write!(out, "  (clear filters)");
        }
        let _ = writeln!(out);
    }

    if vm.is_loading {
        return;
    }

    if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} {}", empty.icon, empty.title);
        let _ = writeln!(out, "{}", empty.message);
        let _ = writeln!(out, "[{}]", empty.action_label);
        return;
    }

    for row in &vm.rows {
        let marker = if row.is_selected { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} #{:<4} {:<width$} {:>9}   {}",
            row.id,
            truncate(&row.title, TITLE_WIDTH),
            row.price,
            row.rating,
            width = TITLE_WIDTH,
        );
    }
}

fn render_detail(out: &mut String, vm: &DetailViewModel) {
    let _ = writeln!(out, "{}", vm.category);
    let _ = writeln!(out, "{}", vm.title);
    let _ = writeln!(out, "{}   {}", vm.rating, vm.price);
    if let Some(error) = &vm.error {
        let _ = writeln!(out, "⚠️  {error}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Description");
    let _ = writeln!(out, "{}", vm.description);
    if !vm.image.is_empty() {
        let _ = writeln!(out, "{}", vm.image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::{CategoryChip, EmptyState, HeaderInfo, ProductRow, SearchBarInfo};

    fn list(rows: Vec<ProductRow>, empty_state: Option<EmptyState>) -> ListViewModel {
        ListViewModel {
            header: HeaderInfo {
                title: "Products".into(),
                subtitle: "1 item available".into(),
            },
            search_bar: SearchBarInfo {
                query: String::new(),
                placeholder: "Search products...".into(),
                editable: true,
            },
            chips: vec![CategoryChip {
                label: "All".into(),
                count: 1,
                is_active: true,
            }],
            show_clear_filters: false,
            rows,
            empty_state,
            error: None,
            is_loading: false,
            is_refreshing: false,
        }
    }

    #[test]
    fn selected_row_is_marked() {
        let vm = ViewModel::List(list(
            vec![ProductRow {
                id: 1,
                title: "Backpack".into(),
                category: "men's clothing".into(),
                price: "$109.95".into(),
                rating: "⭐ 3.9".into(),
                is_selected: true,
            }],
            None,
        ));
        let text = render(&vm);
        assert!(text.contains("[*All 1*]"));
        assert!(text.lines().any(|line| line.starts_with("> #1") && line.contains("$109.95")));
    }

    #[test]
    fn empty_state_replaces_rows() {
        let vm = ViewModel::List(list(
            vec![],
            Some(EmptyState {
                icon: "📦".into(),
                title: "No Products Found".into(),
                message: "We couldn't find any products at the moment.".into(),
                action_label: "Refresh".into(),
            }),
        ));
        let text = render(&vm);
        assert!(text.contains("📦 No Products Found"));
        assert!(text.contains("[Refresh]"));
    }
}
