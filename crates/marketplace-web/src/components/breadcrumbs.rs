//! Navigation trail shown above each page

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use serde::{Deserialize, Serialize};

/// Path of the leading crumb
pub const HOME_PATH: &str = "/";

/// One caller-supplied entry of the trail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreadcrumbItem {
    /// Text shown
    pub label: String,
    /// Where a click goes; `None` renders plain text
    #[serde(default)]
    pub path: Option<String>,
    /// Optional icon name or glyph
    #[serde(default)]
    pub icon: Option<String>,
}

impl BreadcrumbItem {
    /// Entry that links to `path`
    #[must_use]
    pub fn link(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: Some(path.into()),
            icon: None,
        }
    }

    /// Entry without a link
    #[must_use]
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: None,
            icon: None,
        }
    }

    /// Attach an icon
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A crumb ready to render
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Crumb {
    /// Text shown
    pub label: String,
    /// Path, if any
    pub path: Option<String>,
    /// Icon, if any
    pub icon: Option<String>,
    /// Whether the path is the current location
    pub is_current: bool,
}

impl Crumb {
    /// Path a click navigates to; `None` for the current page and plain entries
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        if self.is_current {
            None
        } else {
            self.path.as_deref()
        }
    }
}

/// `Home` followed by `items`, each marked current when its path is `current_path`
#[must_use]
pub fn build_trail(items: &[BreadcrumbItem], current_path: &str) -> Vec<Crumb> {
    let home = BreadcrumbItem::link("Home", HOME_PATH).with_icon("home");

    std::iter::once(&home)
        .chain(items)
        .map(|item| Crumb {
            label: item.label.clone(),
            path: item.path.clone(),
            icon: item.icon.clone(),
            is_current: item.path.as_deref() == Some(current_path),
        })
        .collect()
}

/// Trail rebuilt from `pathname` on every call
///
/// Reading a tracked signal inside `pathname` makes the caller rerun on
/// navigation, so a trail in a layout that outlives its route stays current.
pub fn live_trail(
    items: Vec<BreadcrumbItem>,
    pathname: impl Fn() -> String + Send + Sync + 'static,
) -> impl Fn() -> Vec<Crumb> + Send + Sync + 'static {
    move || build_trail(&items, &pathname())
}

/// Breadcrumb trail with a separator between entries
#[component]
pub fn Breadcrumbs(
    /// Entries after `Home`
    items: Vec<BreadcrumbItem>,
) -> impl IntoView {
    let location = use_location();
    let navigate = use_navigate();
    let crumbs = live_trail(items, move || location.pathname.get());

    view! {
        <nav class="breadcrumbs" aria-label="Breadcrumb">
            <ol class="breadcrumbs-list">
                {move || crumbs()
                    .into_iter()
                    .enumerate()
                    .map(|(index, crumb)| {
                        let separator = (index > 0)
                            .then(|| view! { <span class="breadcrumbs-separator">"/"</span> });
                        let icon = crumb
                            .icon
                            .clone()
                            .map(|icon| view! { <span class="breadcrumbs-icon" data-icon=icon></span> });
                        let target = crumb.target().map(str::to_string);
                        let label = crumb.label;

                        let entry = match (crumb.is_current, target) {
                            (true, _) => view! {
                                <span class="breadcrumbs-current" aria-current="page">
                                    {icon}
                                    {label}
                                </span>
                            }
                            .into_any(),
                            (false, Some(path)) => {
                                let navigate = navigate.clone();
                                view! {
                                    <button
                                        class="breadcrumbs-link"
                                        on:click=move |_| navigate(&path, NavigateOptions::default())
                                    >
                                        {icon}
                                        {label}
                                    </button>
                                }
                                .into_any()
                            }
                            (false, None) => view! {
                                <span class="breadcrumbs-text">
                                    {icon}
                                    {label}
                                </span>
                            }
                            .into_any(),
                        };

                        view! {
                            <li class="breadcrumbs-item">
                                {separator}
                                {entry}
                            </li>
                        }
                    })
                    .collect_view()}
            </ol>
        </nav>
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(trail: &[Crumb]) -> Vec<&str> {
        trail.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_home_leads_the_trail() {
        let trail = build_trail(&[BreadcrumbItem::link("Vendors", "/vendors")], "/admin");

        assert_eq!(labels(&trail), vec!["Home", "Vendors"]);
        assert_eq!(trail[0].target(), Some("/"));
        assert_eq!(trail[1].target(), Some("/vendors"));
        assert!(trail.iter().all(|c| !c.is_current));
    }

    #[test]
    fn test_current_location_is_not_clickable() {
        let trail = build_trail(
            &[
                BreadcrumbItem::link("Admin", "/admin"),
                BreadcrumbItem::link("Deleted products", "/admin/deleted"),
            ],
            "/admin/deleted",
        );

        assert!(!trail[1].is_current);
        assert!(trail[2].is_current);
        assert_eq!(trail[2].target(), None);
    }

    #[test]
    fn test_home_is_current_at_root() {
        let trail = build_trail(&[], "/");
        assert_eq!(trail.len(), 1);
        assert!(trail[0].is_current);
        assert_eq!(trail[0].icon.as_deref(), Some("home"));
    }

    #[test]
    fn test_plain_entry_has_no_target() {
        let trail = build_trail(&[BreadcrumbItem::text("Reports").with_icon("chart")], "/x");
        assert_eq!(trail[1].target(), None);
        assert!(!trail[1].is_current);
        assert_eq!(trail[1].icon.as_deref(), Some("chart"));
    }

    #[test]
    fn test_live_trail_follows_navigation() {
        let pathname = ArcRwSignal::new("/vendors".to_string());
        let trail = live_trail(
            vec![
                BreadcrumbItem::link("Vendors", "/vendors"),
                BreadcrumbItem::link("Super Admin", "/admin"),
            ],
            {
                let pathname = pathname.clone();
                move || pathname.get()
            },
        );

        let before = trail();
        assert!(before[1].is_current);
        assert_eq!(before[2].target(), Some("/admin"));

        pathname.set("/admin".to_string());

        let after = trail();
        assert!(!after[1].is_current);
        assert_eq!(after[1].target(), Some("/vendors"));
        assert!(after[2].is_current);
        assert_eq!(after[2].target(), None);
    }
}
