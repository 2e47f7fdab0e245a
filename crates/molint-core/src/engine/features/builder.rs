use super::{FeatureGroup, FeatureType, Features};
use crate::core::models::ids::UnitAtomIndex;

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Accumulating { x: f64, y: f64, z: f64, count: u32 },
}

/// Accumulates the features of one unit.
///
/// Multi-atom features are built with [`push_member`](Self::push_member)
/// followed by [`add_state`](Self::add_state) (or discarded with
/// [`clear_state`](Self::clear_state)); single-atom features use
/// [`add_one`](Self::add_one). One accumulation is in flight at a time.
#[derive(Debug)]
pub struct FeaturesBuilder {
    chunk_size: usize,
    state: State,
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    types: Vec<FeatureType>,
    groups: Vec<FeatureGroup>,
    offsets: Vec<u32>,
    members: Vec<u32>,
}

fn grow<T>(buffer: &mut Vec<T>, chunk_size: usize) {
    if buffer.len() == buffer.capacity() {
        buffer.reserve(buffer.len().max(chunk_size));
    }
}

impl FeaturesBuilder {
    pub fn new(initial_capacity: usize, chunk_size: usize) -> Self {
        let mut offsets = Vec::with_capacity(initial_capacity + 1);
        offsets.push(0);
        Self {
            chunk_size: chunk_size.max(1),
            state: State::Idle,
            x: Vec::with_capacity(initial_capacity),
            y: Vec::with_capacity(initial_capacity),
            z: Vec::with_capacity(initial_capacity),
            types: Vec::with_capacity(initial_capacity),
            groups: Vec::with_capacity(initial_capacity),
            offsets,
            members: Vec::with_capacity(initial_capacity),
        }
    }

    /// Number of finalized features.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn push_member(&mut self, x: f64, y: f64, z: f64, member: UnitAtomIndex) {
        grow(&mut self.members, self.chunk_size);
        self.members.push(member as u32);
        self.state = match self.state {
            State::Idle => State::Accumulating { x, y, z, count: 1 },
            State::Accumulating {
                x: sx,
                y: sy,
                z: sz,
                count,
            } => State::Accumulating {
                x: sx + x,
                y: sy + y,
                z: sz + z,
                count: count + 1,
            },
        };
    }

    /// Finalizes the pending members as one feature centered on their mean.
    pub fn add_state(&mut self, feature_type: FeatureType, group: FeatureGroup) {
        let State::Accumulating { x, y, z, count } = self.state else {
            return;
        };
        let n = f64::from(count);
        grow(&mut self.x, self.chunk_size);
        grow(&mut self.y, self.chunk_size);
        grow(&mut self.z, self.chunk_size);
        grow(&mut self.types, self.chunk_size);
        grow(&mut self.groups, self.chunk_size);
        grow(&mut self.offsets, self.chunk_size);
        self.x.push(x / n);
        self.y.push(y / n);
        self.z.push(z / n);
        self.types.push(feature_type);
        self.groups.push(group);
        self.offsets.push(self.members.len() as u32);
        self.state = State::Idle;
    }

    /// Drops the pending members without emitting a feature.
    pub fn clear_state(&mut self) {
        if let Some(&last) = self.offsets.last() {
            self.members.truncate(last as usize);
        }
        self.state = State::Idle;
    }

    /// Adds a single-atom feature. Any pending accumulation is discarded.
    pub fn add_one(
        &mut self,
        feature_type: FeatureType,
        group: FeatureGroup,
        x: f64,
        y: f64,
        z: f64,
        member: UnitAtomIndex,
    ) {
        self.clear_state();
        self.push_member(x, y, z, member);
        self.add_state(feature_type, group);
    }

    /// Freezes the features of a unit with `elements_count` atoms.
    ///
    /// Pending, unfinalized members are discarded.
    pub fn get_features(mut self, elements_count: usize) -> Features {
        self.clear_state();
        self.x.shrink_to_fit();
        self.y.shrink_to_fit();
        self.z.shrink_to_fit();
        self.types.shrink_to_fit();
        self.groups.shrink_to_fit();
        self.offsets.shrink_to_fit();
        self.members.shrink_to_fit();
        Features::from_columns(
            self.x,
            self.y,
            self.z,
            self.types,
            self.groups,
            self.offsets,
            self.members,
            elements_count,
        )
    }
}
