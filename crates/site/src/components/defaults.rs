//! Substitutions used by the Learn Git site.

use super::{ComponentTable, Substitution};

/// Creates the default component table.
///
/// This table includes:
/// - Table elements rendered with the site's table classes
/// - `pre`, `img` and `a` marked for the copy button, image and link components
/// - The MDX components the docs use (Tabs, Note, Outlet, Files, Stepper)
///
/// ```
/// use learngit_site::components::defaults::default_learngit_components;
///
/// let table = default_learngit_components();
/// assert_eq!(table.get("Note").map(|s| s.element.as_str()), Some("aside"));
/// assert!(table.get("video").is_none());
/// ```
pub fn default_learngit_components() -> ComponentTable {
    ComponentTable {
        substitutions: vec![
            Substitution::new("table", "table")
                .class("w-full caption-bottom text-sm")
                .component("Table"),
            Substitution::new("thead", "thead")
                .class("[&_tr]:border-b")
                .component("TableHeader"),
            Substitution::new("th", "th")
                .class("h-10 px-2 text-left align-middle font-medium text-muted-foreground")
                .component("TableHead"),
            Substitution::new("tr", "tr")
                .class("border-b transition-colors hover:bg-muted/50")
                .component("TableRow"),
            Substitution::new("tbody", "tbody")
                .class("[&_tr:last-child]:border-0")
                .component("TableBody"),
            Substitution::new("td", "td")
                .class("p-2 align-middle")
                .component("TableCell"),
            Substitution::new("pre", "pre").component("Pre"),
            Substitution::new("img", "img")
                .class("rounded-md border")
                .component("Image"),
            Substitution::new("a", "a").component("Link"),
            Substitution::new("Tabs", "div").class("tabs").component("Tabs"),
            Substitution::new("TabsList", "div")
                .class("tabs-list")
                .component("TabsList"),
            Substitution::new("TabsTrigger", "button")
                .class("tabs-trigger")
                .component("TabsTrigger"),
            Substitution::new("TabsContent", "div")
                .class("tabs-content")
                .component("TabsContent"),
            Substitution::new("Note", "aside").class("note").component("Note"),
            Substitution::new("Outlet", "div")
                .class("outlet grid grid-cols-2 gap-3")
                .component("Outlet"),
            Substitution::new("Files", "div").class("files").component("Files"),
            Substitution::new("Stepper", "ol")
                .class("stepper")
                .component("Stepper"),
            Substitution::new("StepperItem", "li")
                .class("stepper-item")
                .component("StepperItem"),
        ],
    }
}
