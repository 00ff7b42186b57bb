//! DAW session collaborator traits and an in-memory implementation.
//!
//! The framework only ever talks to the session through these traits. The
//! real DAW connection lives outside this workspace; [`LocalSession`] is a
//! self-contained session used by the demo binary and by tests.

/// Playback state of one clip slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipState {
    #[default]
    Empty,
    HasContent,
    Playing,
    PlayQueued,
    Recording,
    RecordQueued,
}

/// Note value grid used for note repeat periods and lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    Quarter,
    QuarterTriplet,
    Eighth,
    EighthTriplet,
    Sixteenth,
    SixteenthTriplet,
    ThirtySecond,
    ThirtySecondTriplet,
}

impl Resolution {
    pub const ALL: [Resolution; 8] = [
        Resolution::Quarter,
        Resolution::QuarterTriplet,
        Resolution::Eighth,
        Resolution::EighthTriplet,
        Resolution::Sixteenth,
        Resolution::SixteenthTriplet,
        Resolution::ThirtySecond,
        Resolution::ThirtySecondTriplet,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn label(self) -> &'static str {
        match self {
            Resolution::Quarter => "1/4",
            Resolution::QuarterTriplet => "1/4t",
            Resolution::Eighth => "1/8",
            Resolution::EighthTriplet => "1/8t",
            Resolution::Sixteenth => "1/16",
            Resolution::SixteenthTriplet => "1/16t",
            Resolution::ThirtySecond => "1/32",
            Resolution::ThirtySecondTriplet => "1/32t",
        }
    }
}

/// Per-track record quantization grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordQuantization {
    #[default]
    Off,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl RecordQuantization {
    pub const ALL: [RecordQuantization; 5] = [
        RecordQuantization::Off,
        RecordQuantization::Quarter,
        RecordQuantization::Eighth,
        RecordQuantization::Sixteenth,
        RecordQuantization::ThirtySecond,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|q| *q == self).unwrap_or(0)
    }
}

/// Transport flags and global timing.
pub trait Transport {
    fn is_playing(&self) -> bool;
    fn toggle_play(&mut self);
    fn is_recording(&self) -> bool;
    fn toggle_record(&mut self);
    fn is_metronome_on(&self) -> bool;
    fn toggle_metronome(&mut self);
    fn tap_tempo(&mut self);
    fn is_loop(&self) -> bool;
    fn toggle_loop(&mut self);

    fn is_launcher_overdub(&self) -> bool;
    fn toggle_launcher_overdub(&mut self);
    fn is_arranger_overdub(&self) -> bool;
    fn toggle_arranger_overdub(&mut self);

    fn is_writing_clip_automation(&self) -> bool;
    fn toggle_writing_clip_automation(&mut self);
    fn is_writing_arranger_automation(&self) -> bool;
    fn toggle_writing_arranger_automation(&mut self);

    fn tempo(&self) -> f64;
    fn change_tempo(&mut self, delta: f64);
    fn shuffle(&self) -> f64;
    fn change_shuffle(&mut self, delta: f64);
    fn master_volume(&self) -> f64;
    fn change_master_volume(&mut self, delta: f64);
}

/// Clip slots of the current track page.
pub trait TrackBank {
    fn track_exists(&self, track: usize) -> bool;
    fn is_armed(&self, track: usize) -> bool;
    fn clip_state(&self, track: usize, slot: usize) -> ClipState;
    fn launch_clip(&mut self, track: usize, slot: usize);
    fn record_clip(&mut self, track: usize, slot: usize);
    fn delete_clip(&mut self, track: usize, slot: usize);
    fn duplicate_clip(&mut self, track: usize, slot: usize);
    fn stop_all_clips(&mut self);
}

/// Scene rows behind the scene-launch buttons.
pub trait SceneBank {
    fn scene_exists(&self, index: usize) -> bool;
    fn is_scene_selected(&self, index: usize) -> bool;
    fn launch_scene(&mut self, index: usize);
    fn can_scroll_page_backwards(&self) -> bool;
    fn can_scroll_page_forwards(&self) -> bool;
    fn select_previous_page(&mut self);
    fn select_next_page(&mut self);
}

/// The track the cursor follows.
pub trait CursorTrack {
    fn exists(&self) -> bool;
    fn record_quantization(&self) -> RecordQuantization;
    fn set_record_quantization(&mut self, quantization: RecordQuantization);
}

/// Project-level operations.
pub trait Application {
    fn undo(&mut self);
    fn redo(&mut self);
    fn quantize(&mut self);
    fn new_clip(&mut self, length_index: usize);
    fn double_clip(&mut self);
    fn add_instrument_track(&mut self);
    fn add_audio_track(&mut self);
    fn add_effect_track(&mut self);
}

/// Aggregate access to the session collaborators.
pub trait SessionModel {
    fn transport(&self) -> &dyn Transport;
    fn transport_mut(&mut self) -> &mut dyn Transport;
    fn track_bank(&self) -> &dyn TrackBank;
    fn track_bank_mut(&mut self) -> &mut dyn TrackBank;
    fn scene_bank(&self) -> &dyn SceneBank;
    fn scene_bank_mut(&mut self) -> &mut dyn SceneBank;
    fn cursor_track(&self) -> &dyn CursorTrack;
    fn cursor_track_mut(&mut self) -> &mut dyn CursorTrack;
    fn application_mut(&mut self) -> &mut dyn Application;
}

const PAGE_SIZE: usize = 8;

/// In-memory session: 8 visible tracks, a pageable bank of scenes, and
/// plain flags for everything else.
pub struct LocalSession {
    playing: bool,
    recording: bool,
    metronome: bool,
    looping: bool,
    launcher_overdub: bool,
    arranger_overdub: bool,
    clip_automation: bool,
    arranger_automation: bool,
    tempo: f64,
    shuffle: f64,
    master_volume: f64,
    tap_count: u32,

    track_count: usize,
    armed: Vec<bool>,
    clips: Vec<Vec<ClipState>>,
    scene_count: usize,
    scene_offset: usize,
    selected_scene: Option<usize>,
    cursor_track: Option<usize>,
    record_quantization: RecordQuantization,

    undo_depth: u32,
    redo_depth: u32,
}

impl LocalSession {
    pub fn new() -> Self {
        let track_count = 8;
        let scene_count = 16;
        let mut session = Self {
            playing: false,
            recording: false,
            metronome: false,
            looping: false,
            launcher_overdub: false,
            arranger_overdub: false,
            clip_automation: false,
            arranger_automation: false,
            tempo: 120.0,
            shuffle: 0.0,
            master_volume: 0.8,
            tap_count: 0,
            track_count,
            armed: vec![false; track_count],
            clips: vec![vec![ClipState::Empty; scene_count]; track_count],
            scene_count,
            scene_offset: 0,
            selected_scene: Some(0),
            cursor_track: Some(0),
            record_quantization: RecordQuantization::Off,
            undo_depth: 0,
            redo_depth: 0,
        };
        session.armed[0] = true;
        // A couple of clips so the session view lights up out of the box.
        session.clips[0][0] = ClipState::HasContent;
        session.clips[1][0] = ClipState::HasContent;
        session.clips[2][1] = ClipState::HasContent;
        session
    }

    fn absolute_scene(&self, index: usize) -> usize {
        self.scene_offset + index
    }

    pub fn undo_depth(&self) -> u32 {
        self.undo_depth
    }
}

impl Default for LocalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for LocalSession {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    fn toggle_record(&mut self) {
        self.recording = !self.recording;
    }

    fn is_metronome_on(&self) -> bool {
        self.metronome
    }

    fn toggle_metronome(&mut self) {
        self.metronome = !self.metronome;
    }

    fn tap_tempo(&mut self) {
        self.tap_count += 1;
    }

    fn is_loop(&self) -> bool {
        self.looping
    }

    fn toggle_loop(&mut self) {
        self.looping = !self.looping;
    }

    fn is_launcher_overdub(&self) -> bool {
        self.launcher_overdub
    }

    fn toggle_launcher_overdub(&mut self) {
        self.launcher_overdub = !self.launcher_overdub;
    }

    fn is_arranger_overdub(&self) -> bool {
        self.arranger_overdub
    }

    fn toggle_arranger_overdub(&mut self) {
        self.arranger_overdub = !self.arranger_overdub;
    }

    fn is_writing_clip_automation(&self) -> bool {
        self.clip_automation
    }

    fn toggle_writing_clip_automation(&mut self) {
        self.clip_automation = !self.clip_automation;
    }

    fn is_writing_arranger_automation(&self) -> bool {
        self.arranger_automation
    }

    fn toggle_writing_arranger_automation(&mut self) {
        self.arranger_automation = !self.arranger_automation;
    }

    fn tempo(&self) -> f64 {
        self.tempo
    }

    fn change_tempo(&mut self, delta: f64) {
        self.tempo = (self.tempo + delta).clamp(20.0, 666.0);
    }

    fn shuffle(&self) -> f64 {
        self.shuffle
    }

    fn change_shuffle(&mut self, delta: f64) {
        self.shuffle = (self.shuffle + delta).clamp(0.0, 1.0);
    }

    fn master_volume(&self) -> f64 {
        self.master_volume
    }

    fn change_master_volume(&mut self, delta: f64) {
        self.master_volume = (self.master_volume + delta).clamp(0.0, 1.0);
    }
}

impl TrackBank for LocalSession {
    fn track_exists(&self, track: usize) -> bool {
        track < self.track_count
    }

    fn is_armed(&self, track: usize) -> bool {
        self.armed.get(track).copied().unwrap_or(false)
    }

    fn clip_state(&self, track: usize, slot: usize) -> ClipState {
        let scene = self.scene_offset + slot;
        self.clips
            .get(track)
            .and_then(|column| column.get(scene))
            .copied()
            .unwrap_or(ClipState::Empty)
    }

    fn launch_clip(&mut self, track: usize, slot: usize) {
        let scene = self.scene_offset + slot;
        if let Some(state) = self.clips.get_mut(track).and_then(|c| c.get_mut(scene)) {
            *state = match *state {
                ClipState::Empty => ClipState::Empty,
                ClipState::Playing => ClipState::HasContent,
                _ => ClipState::PlayQueued,
            };
            if *state == ClipState::PlayQueued && !self.playing {
                *state = ClipState::Playing;
            }
        }
    }

    fn record_clip(&mut self, track: usize, slot: usize) {
        let scene = self.scene_offset + slot;
        if let Some(state) = self.clips.get_mut(track).and_then(|c| c.get_mut(scene)) {
            *state = ClipState::Recording;
        }
    }

    fn delete_clip(&mut self, track: usize, slot: usize) {
        let scene = self.scene_offset + slot;
        if let Some(state) = self.clips.get_mut(track).and_then(|c| c.get_mut(scene)) {
            *state = ClipState::Empty;
        }
    }

    fn duplicate_clip(&mut self, track: usize, slot: usize) {
        let scene = self.scene_offset + slot;
        let source = self
            .clips
            .get(track)
            .and_then(|column| column.get(scene))
            .copied()
            .unwrap_or(ClipState::Empty);
        if source == ClipState::Empty {
            return;
        }
        if let Some(state) = self
            .clips
            .get_mut(track)
            .and_then(|c| c.get_mut(scene + 1))
        {
            *state = ClipState::HasContent;
        }
    }

    fn stop_all_clips(&mut self) {
        for column in &mut self.clips {
            for state in column.iter_mut() {
                if matches!(*state, ClipState::Playing | ClipState::PlayQueued) {
                    *state = ClipState::HasContent;
                }
            }
        }
    }
}

impl SceneBank for LocalSession {
    fn scene_exists(&self, index: usize) -> bool {
        self.absolute_scene(index) < self.scene_count
    }

    fn is_scene_selected(&self, index: usize) -> bool {
        self.selected_scene == Some(self.absolute_scene(index))
    }

    fn launch_scene(&mut self, index: usize) {
        if !self.scene_exists(index) {
            return;
        }
        let scene = self.absolute_scene(index);
        self.selected_scene = Some(scene);
        for track in 0..self.track_count {
            if self.clips[track][scene] != ClipState::Empty {
                self.clips[track][scene] = ClipState::Playing;
            }
        }
    }

    fn can_scroll_page_backwards(&self) -> bool {
        self.scene_offset > 0
    }

    fn can_scroll_page_forwards(&self) -> bool {
        self.scene_offset + PAGE_SIZE < self.scene_count
    }

    fn select_previous_page(&mut self) {
        self.scene_offset = self.scene_offset.saturating_sub(PAGE_SIZE);
    }

    fn select_next_page(&mut self) {
        if self.can_scroll_page_forwards() {
            self.scene_offset += PAGE_SIZE;
        }
    }
}

impl CursorTrack for LocalSession {
    fn exists(&self) -> bool {
        self.cursor_track.is_some()
    }

    fn record_quantization(&self) -> RecordQuantization {
        self.record_quantization
    }

    fn set_record_quantization(&mut self, quantization: RecordQuantization) {
        self.record_quantization = quantization;
    }
}

impl Application for LocalSession {
    fn undo(&mut self) {
        self.undo_depth = self.undo_depth.saturating_sub(1);
        self.redo_depth += 1;
    }

    fn redo(&mut self) {
        self.redo_depth = self.redo_depth.saturating_sub(1);
        self.undo_depth += 1;
    }

    fn quantize(&mut self) {
        self.undo_depth += 1;
    }

    fn new_clip(&mut self, _length_index: usize) {
        if let (Some(track), Some(scene)) = (self.cursor_track, self.selected_scene) {
            if self.clips[track][scene] == ClipState::Empty {
                self.clips[track][scene] = ClipState::HasContent;
            }
        }
    }

    fn double_clip(&mut self) {
        self.undo_depth += 1;
    }

    fn add_instrument_track(&mut self) {
        self.add_track();
    }

    fn add_audio_track(&mut self) {
        self.add_track();
    }

    fn add_effect_track(&mut self) {
        self.add_track();
    }
}

impl LocalSession {
    fn add_track(&mut self) {
        self.track_count += 1;
        self.armed.push(false);
        self.clips.push(vec![ClipState::Empty; self.scene_count]);
    }
}

impl SessionModel for LocalSession {
    fn transport(&self) -> &dyn Transport {
        self
    }

    fn transport_mut(&mut self) -> &mut dyn Transport {
        self
    }

    fn track_bank(&self) -> &dyn TrackBank {
        self
    }

    fn track_bank_mut(&mut self) -> &mut dyn TrackBank {
        self
    }

    fn scene_bank(&self) -> &dyn SceneBank {
        self
    }

    fn scene_bank_mut(&mut self) -> &mut dyn SceneBank {
        self
    }

    fn cursor_track(&self) -> &dyn CursorTrack {
        self
    }

    fn cursor_track_mut(&mut self) -> &mut dyn CursorTrack {
        self
    }

    fn application_mut(&mut self) -> &mut dyn Application {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_paging_moves_the_window() {
        let mut session = LocalSession::new();
        assert!(session.scene_exists(7));
        assert!(!session.can_scroll_page_backwards());
        assert!(session.can_scroll_page_forwards());

        session.select_next_page();
        assert!(session.scene_exists(7));
        assert!(!session.can_scroll_page_forwards());

        session.select_next_page();
        assert!(session.can_scroll_page_backwards());
    }

    #[test]
    fn launch_scene_selects_and_plays() {
        let mut session = LocalSession::new();
        session.launch_scene(0);
        assert!(session.is_scene_selected(0));
        assert_eq!(session.clip_state(0, 0), ClipState::Playing);

        session.stop_all_clips();
        assert_eq!(session.clip_state(0, 0), ClipState::HasContent);
    }

    #[test]
    fn out_of_range_scene_does_not_exist() {
        let mut session = LocalSession::new();
        assert!(!session.scene_exists(16));
        session.select_next_page();
        assert!(session.scene_exists(7));
        assert!(!session.scene_exists(8));
    }
}
