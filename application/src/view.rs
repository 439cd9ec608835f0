//! Terminal rendering of the registry data.

use common::pagination::{Page, PageInfo};
use itertools::Itertools as _;
use service::{
    domain::{registration::Registered, user::Document, Catalogs, User},
    notify::{Level, Notification},
    validation::Errors,
    Notifier,
};

/// Placeholder of a value the registry didn't report.
pub const NOT_AVAILABLE: &str = "not available";

/// Text shown instead of an empty users listing.
pub const NO_USERS: &str = "There are no registered users yet.";

/// Text shown instead of an empty documents table.
pub const NO_DOCUMENTS: &str = "no documents registered";

/// [`Notifier`] printing [`Notification`]s to the terminal.
///
/// Errors go to the standard error, successes to the standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Console;

impl Notifier for Console {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Error => eprintln!("{notification}"),
            Level::Success => println!("{notification}"),
        }
    }
}

/// Renders the provided [`Page`] of [`User`]s with its navigation info.
#[must_use]
pub fn page(page: Page<'_, User>) -> String {
    if page.is_empty() {
        return NO_USERS.to_owned();
    }

    let PageInfo {
        number,
        total_pages,
        total_items,
        has_previous_page,
        has_next_page,
    } = page.info;
    let navigation = [
        has_previous_page.then(|| format!("previous: --page {}", number - 1)),
        has_next_page.then(|| format!("next: --page {}", number + 1)),
    ]
    .into_iter()
    .flatten()
    .join(", ");

    let mut footer =
        format!("page {number} of {total_pages} ({total_items} users)");
    if !navigation.is_empty() {
        footer = format!("{footer}; {navigation}");
    }
    format!("{}\n\n{footer}", page.items.iter().map(row).join("\n"))
}

/// Renders the summary row of the provided [`User`].
#[must_use]
pub fn row(user: &User) -> String {
    let contact = user.contact_info.as_ref();
    [
        format!("#{}", user.id),
        user.username.to_string(),
        or_not_available(Some(user.full_name())),
        user.email.to_string(),
        or_not_available(contact.and_then(|c| c.country_name.clone())),
        or_not_available(contact.and_then(|c| c.cell_phone.clone())),
        verification(user).to_owned(),
    ]
    .into_iter()
    .join(" | ")
}

/// Renders the detailed view of the provided [`User`].
#[must_use]
pub fn detail(user: &User) -> String {
    let contact = user.contact_info.clone().unwrap_or_default();
    let emergency = match (contact.emergency_name, contact.emergency_phone) {
        (Some(name), Some(phone)) => Some(format!("{name} ({phone})")),
        (name, phone) => name.or(phone),
    };

    let documents = if user.documents.is_empty() {
        format!("  {NO_DOCUMENTS}")
    } else {
        ["  Type | Number | Issue date | Place".to_owned()]
            .into_iter()
            .chain(user.documents.iter().map(document))
            .join("\n")
    };

    [
        format!("User #{}", user.id),
        format!("  Username: {}", user.username),
        format!("  Email: {} ({})", user.email, verification(user)),
        format!("  Full name: {}", or_not_available(Some(user.full_name()))),
        format!(
            "  Registered: {}",
            or_not_available(
                user.created_at.map(|at| at.date::<()>().to_long()),
            ),
        ),
        "Contact information".to_owned(),
        format!("  Cell phone: {}", or_not_available(contact.cell_phone)),
        format!("  Phone: {}", or_not_available(contact.phone)),
        format!("  Address: {}", or_not_available(contact.address)),
        format!("  City: {}", or_not_available(contact.city)),
        format!("  Country: {}", or_not_available(contact.country_name)),
        format!("  Emergency contact: {}", or_not_available(emergency)),
        "Documents".to_owned(),
        documents,
    ]
    .into_iter()
    .join("\n")
}

/// Renders the provided [`Catalogs`] as two id-indexed lists.
#[must_use]
pub fn catalogs(catalogs: &Catalogs) -> String {
    let countries = catalogs
        .countries
        .iter()
        .map(|c| format!("  {:>3}  {}  {}", i32::from(c.id), c.code, c.name));
    let document_types = catalogs.document_types.iter().map(|t| {
        format!("  {:>3}  {}", i32::from(t.id), document_type_name(&t.name))
    });

    ["Countries".to_owned()]
        .into_iter()
        .chain(countries)
        .chain(["Document types".to_owned()])
        .chain(document_types)
        .join("\n")
}

/// Renders the per-field validation [`Errors`].
#[must_use]
pub fn errors(errors: &Errors) -> String {
    errors
        .iter()
        .map(|(field, violated)| format!("  {field}: {violated}"))
        .join("\n")
}

/// Renders the outcome of a successful registration.
#[must_use]
pub fn registered(registered: &Registered) -> String {
    let Registered {
        id,
        username,
        email,
    } = registered;
    format!(
        "Registered user #{id}: {username} <{email}>\n\
         The form is cleared, you can create a new record.",
    )
}

/// Renders a single row of the documents table.
fn document(doc: &Document) -> String {
    let cells = [
        or_not_available(doc.type_name.as_deref().map(document_type_name)),
        or_not_available(doc.number.clone()),
        or_not_available(doc.date_of_issue.map(|d| d.to_iso())),
        or_not_available(doc.place_of_issue.clone()),
    ];
    format!("  {}", cells.iter().join(" | "))
}

/// Returns the human-readable name of a document type.
fn document_type_name(name: &str) -> String {
    if name == "PASSPORT" {
        "Passport".to_owned()
    } else {
        name.to_owned()
    }
}

/// Returns the email verification status of the provided [`User`].
const fn verification(user: &User) -> &'static str {
    if user.email_verified {
        "verified"
    } else {
        "not verified"
    }
}

/// Returns the provided `value`, or [`NOT_AVAILABLE`] if it's absent or
/// blank.
fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}
