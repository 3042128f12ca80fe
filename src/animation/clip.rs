//! Keyframe clips and the mixer that plays them onto a scene graph

use cgmath::{Vector3, VectorSpace};

use crate::{
    error::AnimationError,
    gfx::scene::{NodeId, SceneGraph, Transform},
};

/// Transform component a track drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackProperty {
    Position,
    /// Euler angles in radians
    Rotation,
    Scale,
}

/// Linearly interpolated keyframes for one property of one named node
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack {
    pub target: String,
    pub property: TrackProperty,
    times: Vec<f32>,
    values: Vec<Vector3<f32>>,
}

impl KeyframeTrack {
    /// `times` must be non-decreasing and match `values` in length
    pub fn new(
        target: impl Into<String>,
        property: TrackProperty,
        times: Vec<f32>,
        values: Vec<Vector3<f32>>,
    ) -> Result<Self, AnimationError> {
        let target = target.into();
        if times.len() != values.len() {
            return Err(AnimationError::MismatchedKeyframes {
                target,
                times: times.len(),
                values: values.len(),
            });
        }
        if times.is_empty() {
            return Err(AnimationError::EmptyTrack(target));
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(AnimationError::NonFiniteTime(target));
        }
        if times.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(AnimationError::UnsortedTimes(target));
        }
        Ok(Self {
            target,
            property,
            times,
            values,
        })
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    /// Time of the last keyframe
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value at `time`, clamped to the first and last keyframes
    pub fn sample(&self, time: f32) -> Vector3<f32> {
        let last = self.times.len() - 1;
        if time <= self.times[0] {
            return self.values[0];
        }
        if time >= self.times[last] {
            return self.values[last];
        }
        // First keyframe strictly after `time`; always in 1..=last here
        let next = self.times.partition_point(|&t| t <= time);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        if span <= f32::EPSILON {
            return self.values[next];
        }
        let alpha = (time - self.times[prev]) / span;
        self.values[prev].lerp(self.values[next], alpha)
    }

    fn apply(&self, transform: &mut Transform, time: f32) {
        let value = self.sample(time);
        match self.property {
            TrackProperty::Position => transform.position = value,
            TrackProperty::Rotation => transform.rotation = value,
            TrackProperty::Scale => transform.scale = value,
        }
    }
}

/// Named set of tracks played together
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<KeyframeTrack>,
}

impl AnimationClip {
    /// Clip whose duration is the latest keyframe of any track
    pub fn new(name: impl Into<String>, tracks: Vec<KeyframeTrack>) -> Self {
        let duration = tracks
            .iter()
            .map(KeyframeTrack::end_time)
            .fold(0.0, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// One full turn of `target` around Y over `duration` seconds
    pub fn turntable(target: impl Into<String>, duration: f32) -> Result<Self, AnimationError> {
        let track = KeyframeTrack::new(
            target,
            TrackProperty::Rotation,
            vec![0.0, duration],
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, std::f32::consts::TAU, 0.0),
            ],
        )?;
        Ok(Self::new("turntable", vec![track]))
    }
}

/// Plays one clip onto the nodes of a subtree
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    clip: AnimationClip,
    bindings: Vec<(usize, NodeId)>,
    time: f32,
    pub time_scale: f32,
    pub looping: bool,
}

impl AnimationMixer {
    /// Binds each track to the first node below `root` carrying its target name
    ///
    /// Tracks whose target cannot be found are skipped.
    pub fn new(clip: AnimationClip, graph: &SceneGraph, root: NodeId) -> Self {
        let bindings = clip
            .tracks
            .iter()
            .enumerate()
            .filter_map(|(index, track)| match graph.find_in(root, &track.target) {
                Some(node) => Some((index, node)),
                None => {
                    log::warn!(
                        "Clip `{}`: no node named `{}`, track skipped",
                        clip.name,
                        track.target
                    );
                    None
                }
            })
            .collect();

        Self {
            clip,
            bindings,
            time: 0.0,
            time_scale: 1.0,
            looping: true,
        }
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn bound_tracks(&self) -> usize {
        self.bindings.len()
    }

    /// Advances by `delta` seconds and writes sampled values into the graph
    pub fn update(&mut self, graph: &mut SceneGraph, delta: f32) {
        let duration = self.clip.duration;
        self.time += delta * self.time_scale;
        if duration > 0.0 {
            self.time = if self.looping {
                self.time.rem_euclid(duration)
            } else {
                self.time.clamp(0.0, duration)
            };
        }

        for &(track, node) in &self.bindings {
            if let Some(transform) = graph.transform_mut(node) {
                self.clip.tracks[track].apply(transform, self.time);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Node;

    fn slide() -> KeyframeTrack {
        KeyframeTrack::new(
            "model",
            TrackProperty::Position,
            vec![0.0, 1.0],
            vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_interpolates_and_clamps() {
        let track = slide();
        assert_eq!(track.sample(-1.0), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(track.sample(0.25), Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(track.sample(5.0), Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_track_validation() {
        let mismatched = KeyframeTrack::new(
            "a",
            TrackProperty::Scale,
            vec![0.0, 1.0],
            vec![Vector3::new(1.0, 1.0, 1.0)],
        );
        assert!(matches!(
            mismatched,
            Err(AnimationError::MismatchedKeyframes { times: 2, values: 1, .. })
        ));

        let unsorted = KeyframeTrack::new(
            "a",
            TrackProperty::Scale,
            vec![1.0, 0.0],
            vec![Vector3::new(1.0, 1.0, 1.0); 2],
        );
        assert!(matches!(unsorted, Err(AnimationError::UnsortedTimes(_))));

        let empty = KeyframeTrack::new("a", TrackProperty::Scale, vec![], vec![]);
        assert!(matches!(empty, Err(AnimationError::EmptyTrack(_))));
    }

    #[test]
    fn test_track_rejects_non_finite_times() {
        for times in [vec![f32::NAN, 1.0], vec![0.0, f32::INFINITY]] {
            let track = KeyframeTrack::new(
                "a",
                TrackProperty::Position,
                times,
                vec![Vector3::new(0.0, 0.0, 0.0); 2],
            );
            assert!(matches!(track, Err(AnimationError::NonFiniteTime(_))));
        }
    }

    #[test]
    fn test_mixer_loops() {
        let mut graph = SceneGraph::new();
        let root = graph.add(Node::group("asset").with_child(Node::group("model")));
        let model = graph.find_in(root, "model").unwrap();

        let clip = AnimationClip::new("slide", vec![slide()]);
        let mut mixer = AnimationMixer::new(clip, &graph, root);
        assert_eq!(mixer.bound_tracks(), 1);

        mixer.update(&mut graph, 0.5);
        assert_eq!(graph.transform(model).unwrap().position.x, 1.0);

        mixer.update(&mut graph, 0.75);
        assert!((mixer.time() - 0.25).abs() < 1e-6);
        assert!((graph.transform(model).unwrap().position.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_mixer_skips_unknown_targets() {
        let mut graph = SceneGraph::new();
        let root = graph.add(Node::group("asset"));
        let clip = AnimationClip::new("slide", vec![slide()]);
        let mut mixer = AnimationMixer::new(clip, &graph, root);
        assert_eq!(mixer.bound_tracks(), 0);
        mixer.update(&mut graph, 0.5);
        assert_eq!(graph.transform(root).unwrap().position.x, 0.0);
    }

    #[test]
    fn test_turntable_duration() {
        let clip = AnimationClip::turntable("model", 8.0).unwrap();
        assert_eq!(clip.duration, 8.0);
        assert_eq!(clip.tracks[0].sample(4.0).y, std::f32::consts::PI);
    }
}
