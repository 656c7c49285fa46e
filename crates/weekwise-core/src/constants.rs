/// Product identity constants shared across crates
pub const PRODUCT_NAME: &str = "Weekwise";

/// PRODID emitted on every exported VCALENDAR.
pub const PRODID: &str = const_str::concat!(
    "-//",
    PRODUCT_NAME,
    "//",
    PRODUCT_NAME,
    " Timetable Export//EN"
);

/// Domain suffix appended to generated UIDs.
pub const UID_DOMAIN: &str = "weekwise";
