
use crate::GeographicBoundary;

/// Unit square from (19, 42) to (20, 43), lon/lat, closing vertex repeated.
pub(crate) fn square_boundary() -> GeographicBoundary {
    GeographicBoundary::polygon(
        "-53296",
        "Montenegro",
        vec![vec![
            (19.0, 42.0),
            (20.0, 42.0),
            (20.0, 43.0),
            (19.0, 43.0),
            (19.0, 42.0),
        ]],
    )
}

/// The square above with a hole from (19.4, 42.4) to (19.6, 42.6).
pub(crate) fn square_with_hole_boundary() -> GeographicBoundary {
    GeographicBoundary::polygon(
        "holed",
        "Square with hole",
        vec![
            vec![(19.0, 42.0), (20.0, 42.0), (20.0, 43.0), (19.0, 43.0)],
            vec![(19.4, 42.4), (19.6, 42.4), (19.6, 42.6), (19.4, 42.6)],
        ],
    )
}
