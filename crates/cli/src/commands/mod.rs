//! Subcommand implementations.

pub mod account;
pub mod browse;
pub mod profile;
pub mod report;
pub mod settings;

use recicla_core::Coordinates;

use crate::context::CliError;

/// Turn `--lat`/`--lon` into coordinates, refusing values off the globe.
pub fn coordinates(at: Option<(f64, f64)>) -> Result<Option<Coordinates>, CliError> {
    at.map(|(latitude, longitude)| {
        let coordinates = Coordinates::new(latitude, longitude);
        if coordinates.is_valid() {
            Ok(coordinates)
        } else {
            Err(CliError::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    })
    .transpose()
}
