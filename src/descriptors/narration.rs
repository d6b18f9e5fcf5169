//! Turn-by-turn narration
//!
//! One left-to-right pass over a described route. Roundabout traversals are
//! folded into a single row carrying the exit ordinal, every other necessary
//! turn becomes one row, and an arrival row closes the list. Each emitted row
//! is also recorded as a `Segment` for route naming.
//!
//! Row layout, as serialized:
//! `[code, street name, length m, running index, duration s, "<len>m", compass, bearing]`

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::TerminalIndexPolicy;
use crate::core::azimuth::compass_label;
use crate::core::facade::RoutingDataFacade;
use crate::core::route::NameId;
use crate::core::turn::{InstructionCode, TurnInstruction};
use crate::description::{Segment, SegmentInformation};

/// One rendered instruction
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionRow {
    pub code: InstructionCode,
    pub street_name: String,
    /// Meters
    pub length: u32,
    /// Necessary segments seen before this row; negative only for an empty
    /// route under `TerminalIndexPolicy::Raw`
    pub position: i64,
    /// Seconds
    pub duration: u32,
    pub compass: &'static str,
    /// Degrees
    pub bearing: u32,
}

impl Serialize for InstructionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(8))?;
        seq.serialize_element(&self.code)?;
        seq.serialize_element(&self.street_name)?;
        seq.serialize_element(&self.length)?;
        seq.serialize_element(&self.position)?;
        seq.serialize_element(&self.duration)?;
        seq.serialize_element(&format!("{}m", self.length))?;
        seq.serialize_element(self.compass)?;
        seq.serialize_element(&self.bearing)?;
        seq.end()
    }
}

/// Result of narrating one route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Narration {
    /// Emitted rows followed by the arrival row
    pub rows: Vec<InstructionRow>,
    /// One record per emitted row, arrival row excluded
    pub segments: Vec<Segment>,
}

/// Roundabout being traversed
#[derive(Debug, Default)]
struct RoundAbout {
    /// Running index at entry, `None` outside a roundabout
    start_index: Option<usize>,
    name_id: NameId,
    leave_at_exit: u32,
}

/// Narrate a post-processed segment sequence
///
/// Consolidation state is created here and dropped on return, so
/// independent calls never influence each other.
pub fn build_instructions<F: RoutingDataFacade>(
    path: &[SegmentInformation],
    facade: &F,
    terminal_index: TerminalIndexPolicy,
) -> Narration {
    let mut round_about = RoundAbout::default();
    let mut narration = Narration::default();
    let mut necessary_running_index: usize = 0;

    for segment in path {
        let turn = segment.turn_instruction;
        if turn.is_necessary() {
            if turn == TurnInstruction::EnterRoundAbout {
                round_about.name_id = segment.name_id;
                round_about.start_index = Some(necessary_running_index);
                tracing::trace!(
                    index = necessary_running_index,
                    name_id = segment.name_id,
                    "entering roundabout"
                );
            } else {
                let code = if turn == TurnInstruction::LeaveRoundAbout {
                    let exit = round_about.leave_at_exit + 1;
                    tracing::trace!(
                        entered_at = ?round_about.start_index,
                        roundabout_name_id = round_about.name_id,
                        exit,
                        "leaving roundabout"
                    );
                    round_about = RoundAbout::default();
                    InstructionCode::Roundabout { exit }
                } else {
                    InstructionCode::Turn(turn)
                };
                narration.push(code, segment, necessary_running_index, facade);
            }
        } else if turn == TurnInstruction::StayOnRoundAbout {
            round_about.leave_at_exit += 1;
        }

        if segment.necessary {
            necessary_running_index += 1;
        }
    }

    let terminal_position = match terminal_index {
        TerminalIndexPolicy::Clamp => necessary_running_index.saturating_sub(1) as i64,
        TerminalIndexPolicy::Raw => necessary_running_index as i64 - 1,
    };
    narration.rows.push(InstructionRow {
        code: InstructionCode::Arrived,
        street_name: String::new(),
        length: 0,
        position: terminal_position,
        duration: 0,
        compass: compass_label(0.0),
        bearing: 0,
    });

    narration
}

impl Narration {
    fn push<F: RoutingDataFacade>(
        &mut self,
        code: InstructionCode,
        segment: &SegmentInformation,
        running_index: usize,
        facade: &F,
    ) {
        let length = segment.length.round() as u32;
        let bearing = segment.bearing as f64 / 10.0;
        self.rows.push(InstructionRow {
            code,
            street_name: facade.name_for_name_id(segment.name_id),
            length,
            position: running_index as i64,
            duration: (segment.duration as f64 / 10.0).round() as u32,
            compass: compass_label(bearing),
            bearing: bearing.round() as u32,
        });
        self.segments
            .push(Segment::new(segment.name_id, length, self.segments.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::facade::NetworkSnapshot;
    use crate::core::route::FixedPointCoordinate;

    fn facade() -> NetworkSnapshot {
        NetworkSnapshot::new(
            vec![],
            vec!["".to_string(), "Main Street".to_string(), "Place Ronde".to_string()],
        )
    }

    fn segment(turn: TurnInstruction, necessary: bool) -> SegmentInformation {
        SegmentInformation {
            necessary,
            ..SegmentInformation::sample(FixedPointCoordinate::default(), 1, 0, turn)
        }
    }

    fn codes(narration: &Narration) -> Vec<String> {
        narration.rows.iter().map(|r| r.code.to_string()).collect()
    }

    #[test]
    fn test_roundabout_consolidated_into_one_row() {
        let path = vec![
            segment(TurnInstruction::EnterRoundAbout, true),
            segment(TurnInstruction::NoTurn, false),
            segment(TurnInstruction::StayOnRoundAbout, true),
            segment(TurnInstruction::NoTurn, false),
            segment(TurnInstruction::StayOnRoundAbout, true),
            segment(TurnInstruction::LeaveRoundAbout, true),
        ];
        let narration = build_instructions(&path, &facade(), TerminalIndexPolicy::Clamp);
        assert_eq!(codes(&narration), vec!["11-3", "15"]);
        assert_eq!(narration.rows[0].position, 3);
        assert_eq!(narration.segments.len(), 1);
    }

    #[test]
    fn test_exit_counter_resets_between_roundabouts() {
        let path = vec![
            segment(TurnInstruction::EnterRoundAbout, true),
            segment(TurnInstruction::StayOnRoundAbout, true),
            segment(TurnInstruction::LeaveRoundAbout, true),
            segment(TurnInstruction::EnterRoundAbout, true),
            segment(TurnInstruction::LeaveRoundAbout, true),
        ];
        let narration = build_instructions(&path, &facade(), TerminalIndexPolicy::Clamp);
        assert_eq!(codes(&narration), vec!["11-2", "11-1", "15"]);
    }

    #[test]
    fn test_running_index_counts_necessary_before_row() {
        let path = vec![
            segment(TurnInstruction::HeadOn, true),
            segment(TurnInstruction::NoTurn, true),
            segment(TurnInstruction::NoTurn, false),
            segment(TurnInstruction::TurnLeft, true),
            segment(TurnInstruction::NoTurn, true),
            segment(TurnInstruction::TurnRight, true),
        ];
        let narration = build_instructions(&path, &facade(), TerminalIndexPolicy::Clamp);
        let positions: Vec<i64> = narration.rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 2, 4, 4]);
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_no_necessary_segments_gives_single_arrival_row() {
        let path = vec![segment(TurnInstruction::NoTurn, false)];

        let clamped = build_instructions(&path, &facade(), TerminalIndexPolicy::Clamp);
        assert_eq!(clamped.rows.len(), 1);
        assert_eq!(clamped.rows[0].code, InstructionCode::Arrived);
        assert_eq!(clamped.rows[0].position, 0);
        assert!(clamped.segments.is_empty());

        let raw = build_instructions(&path, &facade(), TerminalIndexPolicy::Raw);
        assert_eq!(raw.rows[0].position, -1);
    }

    #[test]
    fn test_two_leg_example() {
        // Three necessary samples, the last one a left turn, then a leg
        // without any necessary sample
        let path = vec![
            segment(TurnInstruction::NoTurn, true),
            segment(TurnInstruction::NoTurn, true),
            segment(TurnInstruction::TurnLeft, true),
            segment(TurnInstruction::NoTurn, false),
            segment(TurnInstruction::NoTurn, false),
        ];
        let narration = build_instructions(&path, &facade(), TerminalIndexPolicy::Clamp);
        assert_eq!(codes(&narration), vec!["7", "15"]);
        assert_eq!(narration.rows[0].position, 2);
        assert_eq!(narration.rows[1].position, 2);
    }

    #[test]
    fn test_row_fields_and_serialization() {
        let mut s = segment(TurnInstruction::TurnRight, true);
        s.length = 1234.6;
        s.duration = 125;
        s.bearing = 1805;
        s.name_id = 1;
        let narration = build_instructions(&[s], &facade(), TerminalIndexPolicy::Clamp);

        let row = serde_json::to_value(&narration.rows[0]).unwrap();
        assert_eq!(
            row,
            serde_json::json!(["3", "Main Street", 1235, 0, 13, "1235m", "S", 181])
        );
        let arrival = serde_json::to_value(&narration.rows[1]).unwrap();
        assert_eq!(arrival, serde_json::json!(["15", "", 0, 0, 0, "0m", "N", 0]));

        assert_eq!(narration.segments, vec![Segment::new(1, 1235, 0)]);
    }

    #[test]
    fn test_independent_calls_share_nothing() {
        let busy = vec![segment(TurnInstruction::TurnLeft, true); 50];
        let first = build_instructions(&busy, &facade(), TerminalIndexPolicy::Clamp);
        assert_eq!(first.rows[49].position, 49);

        let short = vec![
            segment(TurnInstruction::HeadOn, true),
            segment(TurnInstruction::StayOnRoundAbout, true),
            segment(TurnInstruction::LeaveRoundAbout, true),
        ];
        let second = build_instructions(&short, &facade(), TerminalIndexPolicy::Clamp);
        assert_eq!(second.rows[0].position, 0);
        assert_eq!(codes(&second), vec!["10", "11-2", "15"]);
        assert_eq!(second.segments[0].position, 0);
    }
}
