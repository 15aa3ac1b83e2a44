//! The built-in template catalog.
//!
//! Ids inside a template are placeholders; every instantiation replaces them.

use crate::category::Category;
use crate::template::ComponentTemplate;
use pagecraft_model::{ElementKind, PageElement};

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/600x400?text=Your+Image";
const PLACEHOLDER_CARD_IMAGE: &str = "https://via.placeholder.com/400x200?text=Card+Image";
const COLUMN_CLASS: &str = "p-4 bg-gray-100 dark:bg-gray-800 rounded-lg min-h-32";
const NAV_ITEM_CLASS: &str = "text-gray-700 dark:text-gray-300 hover:text-blue-600 cursor-pointer";

fn editable(id: &str, kind: ElementKind, class_name: &str) -> PageElement {
    PageElement::new(id, kind)
        .with_class(class_name)
        .with_setting("editable", true)
}

fn text(id: &str, content: &str, tag: &str, class_name: &str) -> PageElement {
    editable(id, ElementKind::Text, class_name)
        .with_content(content)
        .with_setting("tag", tag)
}

fn column(id: &str) -> PageElement {
    editable(id, ElementKind::Container, COLUMN_CLASS)
}

fn grid(id: &str, columns: u32) -> PageElement {
    let children = (1..=columns).map(|n| column(&format!("col-{}", n))).collect();
    editable(
        id,
        ElementKind::Grid,
        &format!("grid grid-cols-1 md:grid-cols-{} gap-6", columns),
    )
    .with_style("width", "100%")
    .with_setting("columns", columns)
    .with_children(children)
}

fn hero() -> PageElement {
    let content = editable("hero-content", ElementKind::Container, "max-w-4xl mx-auto")
        .with_child(text(
            "hero-title",
            "Welcome to Our Amazing Service",
            "h1",
            "text-5xl font-bold mb-6",
        ))
        .with_child(text(
            "hero-subtitle",
            "We provide the best solutions for your business needs",
            "p",
            "text-xl mb-8 opacity-90",
        ))
        .with_child(
            editable(
                "hero-cta",
                ElementKind::Button,
                "bg-white text-blue-600 font-semibold py-3 px-8 rounded-lg hover:bg-gray-100 transition-colors duration-200",
            )
            .with_content("Get Started")
            .with_setting("href", "#"),
        );

    editable(
        "hero",
        ElementKind::Hero,
        "bg-gradient-to-r from-blue-600 to-purple-600 text-white py-20 px-6 text-center",
    )
    .with_style("minHeight", "400px")
    .with_style("display", "flex")
    .with_style("alignItems", "center")
    .with_style("justifyContent", "center")
    .with_child(content)
}

fn card() -> PageElement {
    let image = editable("card-image", ElementKind::Image, "w-full h-48 object-cover")
        .with_setting("src", PLACEHOLDER_CARD_IMAGE)
        .with_setting("alt", "Card image");

    let body = editable("card-content", ElementKind::Container, "p-6")
        .with_child(text(
            "card-title",
            "Card Title",
            "h3",
            "text-xl font-semibold mb-2 text-gray-900 dark:text-gray-100",
        ))
        .with_child(text(
            "card-text",
            "This is a sample card description. Add your content here.",
            "p",
            "text-gray-600 dark:text-gray-400",
        ));

    editable(
        "card",
        ElementKind::Card,
        "bg-white dark:bg-gray-900 rounded-lg shadow-lg overflow-hidden",
    )
    .with_style("maxWidth", "400px")
    .with_child(image)
    .with_child(body)
}

fn navigation() -> PageElement {
    let items = ["Home", "About", "Services", "Contact"]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            text(&format!("nav-item-{}", i + 1), label, "a", NAV_ITEM_CLASS).with_setting("href", "#")
        })
        .collect();

    let menu = editable(
        "nav-menu",
        ElementKind::Container,
        "hidden md:flex items-center space-x-8",
    )
    .with_children(items);

    let bar = editable(
        "nav-container",
        ElementKind::Container,
        "max-w-7xl mx-auto px-4 py-4 flex items-center justify-between",
    )
    .with_child(text(
        "nav-logo",
        "Logo",
        "div",
        "text-xl font-bold text-gray-900 dark:text-gray-100",
    ))
    .with_child(menu);

    editable(
        "navigation",
        ElementKind::Navigation,
        "bg-white dark:bg-gray-900 shadow-sm border-b border-gray-200 dark:border-gray-700",
    )
    .with_style("width", "100%")
    .with_child(bar)
}

fn contact_form() -> PageElement {
    editable(
        "contact-form",
        ElementKind::Form,
        "bg-white dark:bg-gray-900 p-6 rounded-lg shadow-lg max-w-md",
    )
    .with_style("width", "100%")
    .with_setting("action", "/api/contact")
    .with_setting("method", "POST")
    .with_child(text(
        "form-title",
        "Contact Us",
        "h3",
        "text-2xl font-bold mb-6 text-gray-900 dark:text-gray-100",
    ))
}

pub(crate) fn standard_templates() -> Vec<ComponentTemplate> {
    vec![
        // Basic
        ComponentTemplate::new(
            "text-heading",
            "Heading",
            Category::Basic,
            "Add headings and titles",
            text(
                "heading",
                "Your Heading Here",
                "h2",
                "text-3xl font-bold text-gray-900 dark:text-gray-100",
            )
            .with_style("marginBottom", "16px"),
        ),
        ComponentTemplate::new(
            "text-paragraph",
            "Paragraph",
            Category::Basic,
            "Add text content",
            text(
                "paragraph",
                "Your paragraph text goes here. Click to edit this content.",
                "p",
                "text-base text-gray-700 dark:text-gray-300 leading-relaxed",
            )
            .with_style("marginBottom", "16px"),
        ),
        ComponentTemplate::new(
            "image-block",
            "Image",
            Category::Basic,
            "Add images and photos",
            editable("image", ElementKind::Image, "w-full h-auto rounded-lg shadow-md")
                .with_style("maxWidth", "100%")
                .with_style("height", "auto")
                .with_setting("src", PLACEHOLDER_IMAGE)
                .with_setting("alt", "Placeholder image"),
        ),
        ComponentTemplate::new(
            "button-primary",
            "Button",
            Category::Basic,
            "Call-to-action buttons",
            editable(
                "button",
                ElementKind::Button,
                "bg-blue-600 hover:bg-blue-700 text-white font-semibold py-3 px-6 rounded-lg transition-colors duration-200",
            )
            .with_content("Click Me")
            .with_style("display", "inline-block")
            .with_setting("href", "#")
            .with_setting("target", "_self"),
        ),
        // Layout
        ComponentTemplate::new(
            "container-section",
            "Section",
            Category::Layout,
            "Full-width content section",
            editable("section", ElementKind::Section, "py-16 px-4 bg-gray-50 dark:bg-gray-800")
                .with_style("width", "100%")
                .with_style("minHeight", "200px")
                .with_setting("containerMaxWidth", "1200px"),
        ),
        ComponentTemplate::new(
            "container-box",
            "Container",
            Category::Layout,
            "Flexible container box",
            editable(
                "container",
                ElementKind::Container,
                "p-6 bg-white dark:bg-gray-900 rounded-lg shadow-sm border border-gray-200 dark:border-gray-700",
            )
            .with_style("minHeight", "100px"),
        ),
        ComponentTemplate::new(
            "grid-2col",
            "2 Column Grid",
            Category::Layout,
            "Two column layout",
            grid("grid", 2),
        ),
        ComponentTemplate::new(
            "grid-3col",
            "3 Column Grid",
            Category::Layout,
            "Three column layout",
            grid("grid", 3),
        ),
        // Components
        ComponentTemplate::new(
            "hero-banner",
            "Hero Banner",
            Category::Components,
            "Large banner with text and CTA",
            hero(),
        ),
        ComponentTemplate::new(
            "card-basic",
            "Card",
            Category::Components,
            "Content card with image and text",
            card(),
        ),
        ComponentTemplate::new(
            "navigation-menu",
            "Navigation",
            Category::Components,
            "Website navigation menu",
            navigation(),
        ),
        // Forms
        ComponentTemplate::new(
            "contact-form",
            "Contact Form",
            Category::Forms,
            "Contact form with fields",
            contact_form(),
        ),
        // Pro
        ComponentTemplate::new(
            "testimonial-slider",
            "Testimonials",
            Category::Pro,
            "Customer testimonials slider",
            editable("testimonials", ElementKind::Container, "bg-gray-50 dark:bg-gray-800 py-16 px-6")
                .with_style("width", "100%"),
        )
        .pro(),
        ComponentTemplate::new(
            "pricing-table",
            "Pricing Table",
            Category::Pro,
            "Pricing plans comparison",
            editable("pricing", ElementKind::Container, "bg-white dark:bg-gray-900 p-8 rounded-lg")
                .with_style("width", "100%"),
        )
        .pro(),
    ]
}
