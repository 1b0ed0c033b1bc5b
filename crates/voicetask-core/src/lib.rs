pub mod audio;
pub mod catalog;
pub mod journal;
pub mod noise;
pub mod paths;
pub mod settings;
pub mod storage;
pub mod task;
pub mod verbose;

#[cfg(feature = "microphone")]
pub use audio::{MicrophoneRecorder, list_input_devices};
pub use audio::{
    AudioRecorder, PressHoldRecorder, RecorderFault, RecorderState, Recording, RecordingLimits,
    RecordingOutcome, StartOutcome,
};
pub use journal::{JOURNAL_KEY, JournalError, JournalSummary, TaskJournal};
pub use noise::{
    LevelNoiseMeter, NoiseCheck, NoiseCheckConfig, NoiseMeter, NoiseVerdict, SimulatedNoiseMeter,
};
pub use paths::{TimestampedPath, photo_path};
pub use settings::Settings;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use task::{Task, TaskType};
pub use verbose::{init_tracing, is_verbose, set_verbose};
