use log::{error, info};
use crate::manager_bom::Bom;
use crate::manager_bom::models::ArgValue;
use crate::manager_bom::transport::Transport;

pub const DEFAULT_LOCATION: &str = "ARCHERFIELD";

/// Fetches observations for a location with default settings and checks the shape of the result.
/// Failures are logged and reported as false, never propagated.
///
/// # Arguments
///
/// * 'bom' - scraper to test
/// * 'location_name' - station name to fetch observations for
pub fn self_test<T: Transport>(bom: &Bom<T>, location_name: impl Into<ArgValue>) -> bool {
    let location_name = location_name.into();
    let shown = location_name.to_text().unwrap_or_else(|_| format!("{:?}", location_name));

    let table = match bom.fetch_default(location_name) {
        Ok(table) => table,
        Err(e) => {
            error!("fetch failed with {}: {}", e.kind(), e);
            return false;
        }
    };

    let passed = table.index().len() == table.rows().len();
    if passed {
        info!("success for location {}, {} observations", shown, table.len());
    } else {
        error!("something wrong with location {}", shown);
    }

    passed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager_bom::DEFAULT_HOST;
    use crate::manager_bom::tests::{observations_body, ScriptedTransport};
    use crate::manager_bom::transport::{HttpResponse, TransportError};
    use crate::manager_bom::transport::tests::{closed_addr, local_transport, serve};

    #[test]
    fn test_self_test_passes() {
        let bom = Bom::with_transport(ScriptedTransport::new(vec![Ok(HttpResponse { status: 200, body: observations_body(3) })]), DEFAULT_HOST);
        assert!(self_test(&bom, DEFAULT_LOCATION));
    }

    #[test]
    fn test_self_test_absorbs_failures() {
        let bom = Bom::with_transport(ScriptedTransport::new(vec![Err(TransportError::Timeout)]), DEFAULT_HOST);
        assert!(!self_test(&bom, DEFAULT_LOCATION));

        let bom = Bom::with_transport(ScriptedTransport::new(vec![]), DEFAULT_HOST);
        assert!(!self_test(&bom, "Moscow"));
        assert!(!self_test(&bom, ""));
    }

    #[test]
    fn test_self_test_over_http() {
        let addr = serve(vec![(200, observations_body(2))]);
        assert!(self_test(&Bom::with_transport(local_transport(), &addr), DEFAULT_LOCATION));

        let addr = closed_addr();
        assert!(!self_test(&Bom::with_transport(local_transport(), &addr), DEFAULT_LOCATION));
    }
}
