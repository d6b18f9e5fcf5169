//! Length-only XML document

use super::Descriptor;
use crate::core::error::Result;
use crate::core::route::RawRoute;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<result>\n";
const FOOTER: &str = "</result>\n";

/// Emits the raw route length scaled by 1/1000
#[derive(Debug, Default, Clone, Copy)]
pub struct LengthDescriptor;

impl LengthDescriptor {
    pub fn new() -> Self {
        Self
    }
}

impl Descriptor for LengthDescriptor {
    fn run(&self, route: &RawRoute) -> Result<Vec<u8>> {
        let mut out = String::from(HEADER);
        let found = route.is_found()
            && route
                .unpacked_path_segments
                .first()
                .is_some_and(|leg| !leg.is_empty());
        if found {
            out.push_str(&format!(
                " <length>{}</length>\n",
                route.shortest_path_length as f64 / 1000.0
            ));
        }
        out.push_str(FOOTER);
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::route::{PathData, PhantomNodes};

    fn route(length: u32) -> RawRoute {
        RawRoute {
            shortest_path_length: length,
            unpacked_path_segments: vec![vec![PathData::default()]],
            segment_end_coordinates: vec![PhantomNodes::default()],
            ..Default::default()
        }
    }

    fn render(route: &RawRoute) -> String {
        String::from_utf8(LengthDescriptor::new().run(route).unwrap()).unwrap()
    }

    #[test]
    fn test_length_scaled() {
        assert_eq!(
            render(&route(12345)),
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<result>\n <length>12.345</length>\n</result>\n",
            )
        );
    }

    #[test]
    fn test_whole_length() {
        assert!(render(&route(3000)).contains(" <length>3</length>\n"));
    }

    #[test]
    fn test_empty_first_leg_has_no_body() {
        let mut r = route(12345);
        r.unpacked_path_segments[0].clear();
        assert!(!render(&r).contains("<length>"));
    }

    #[test]
    fn test_not_found_has_no_body() {
        assert_eq!(
            render(&RawRoute::default()),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<result>\n</result>\n"
        );
    }
}
