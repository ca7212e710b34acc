//! Blueprint → constant-combinator "shopping list".
//!
//! The build cost of a plan is split into groups of at most `capacity`
//! signals, one constant combinator per group, optionally wired to a
//! requester chest next to it.

use std::num::NonZeroUsize;

use tracing::debug;

use crate::aggregate::{aggregate_items, RemapTable};
use crate::codec::{decode_plan, encode_plan};
use crate::error::{Error, Result};
use crate::plan::{
    Blueprint, ControlBehavior, Entity, EntityRequests, Filter, Plan, Position, RequestFilters,
    Section, SectionList, SignalId, Wire, CIRCUIT_GREEN,
};

pub const CONSTANT_COMBINATOR: &str = "constant-combinator";
pub const REQUESTER_CHEST: &str = "requester-chest";

/// Options of the signal conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalOptions {
    pub capacity: NonZeroUsize,
    pub include_requester: bool,
    pub request_from_buffers: bool,
    /// Quality tag written on every signal.
    pub quality: String,
}

impl SignalOptions {
    /// Options with the given capacity; zero is rejected.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(Error::InvalidSignalCapacity)?;
        Ok(Self {
            capacity,
            ..Self::default()
        })
    }
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            capacity: NonZeroUsize::MIN,
            include_requester: true,
            request_from_buffers: true,
            quality: "normal".to_string(),
        }
    }
}

/// Split `items` into consecutive groups of `capacity` (the last may be shorter).
pub fn chunk<T: Clone>(items: &[T], capacity: NonZeroUsize) -> Vec<Vec<T>> {
    items
        .chunks(capacity.get())
        .map(<[T]>::to_vec)
        .collect()
}

/// One constant combinator per chunk, each optionally paired with a requester.
pub fn build_combinators(chunks: &[Vec<(String, u64)>], options: &SignalOptions) -> Blueprint {
    let mut blueprint = Blueprint::new();
    blueprint.set_icons([SignalId::item(CONSTANT_COMBINATOR)]);

    for (column, chunk) in chunks.iter().enumerate() {
        let x = 0.5 + column as f64;

        let mut combinator = Entity::new(CONSTANT_COMBINATOR, Position::new(x, 0.5));
        combinator.control_behavior = Some(ControlBehavior {
            sections: Some(SectionList {
                sections: vec![Section::numbered(
                    1,
                    chunk.iter().map(|(name, count)| {
                        Filter::equals(name.as_str(), options.quality.as_str(), signal_count(*count))
                    }),
                )],
                ..SectionList::default()
            }),
            ..ControlBehavior::default()
        });
        let combinator_number = blueprint.add_entity(combinator);

        if options.include_requester {
            let mut requester = Entity::new(REQUESTER_CHEST, Position::new(x, 1.5));
            requester.control_behavior = Some(ControlBehavior {
                circuit_mode_of_operation: Some(1),
                circuit_condition_enabled: Some(false),
                ..ControlBehavior::default()
            });
            requester.request_filters = Some(EntityRequests::Sections(RequestFilters {
                request_from_buffers: Some(options.request_from_buffers),
                ..RequestFilters::default()
            }));
            let requester_number = blueprint.add_entity(requester);
            blueprint.wires.push(Wire(
                combinator_number,
                CIRCUIT_GREEN,
                requester_number,
                CIRCUIT_GREEN,
            ));
        }
    }

    blueprint
}

/// Aggregate `plan`, chunk the result and lay out the combinators.
pub fn signals_for_plan(plan: &Plan, table: &RemapTable, options: &SignalOptions) -> Blueprint {
    let items = aggregate_items(plan, table);
    let chunks = chunk(items.as_slice(), options.capacity);
    debug!(
        items = items.len(),
        combinators = chunks.len(),
        capacity = options.capacity.get(),
        "packed build cost into signal groups"
    );
    build_combinators(&chunks, options)
}

/// Decode a plan string and return the combinator blueprint as a plan string.
pub fn convert_blueprint_to_signals(
    plan_string: &str,
    table: &RemapTable,
    options: &SignalOptions,
) -> Result<String> {
    let plan = decode_plan(plan_string)?;
    let blueprint = signals_for_plan(&plan, table, options);
    encode_plan(&Plan::Blueprint(blueprint))
}

fn signal_count(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
