pub mod backup;
pub mod config;
pub mod coordinator;
pub mod cover;
pub mod job;
pub mod metadata;
pub mod pool;
pub mod rename;
pub mod testing;

pub use backup::{BackupConfig, BackupError, BackupManager, BackupOutcome};
pub use config::{
    load_config, load_config_from_str, load_layered_config, validate_config, ConfigError,
    ConfigOverrides, RunConfig, RunMode,
};
pub use coordinator::{
    album_directories, discover_audio_files, majority_album, FailureEntry, FolderRenamer,
    FolderResult, RunCoordinator, RunError, RunReport,
};
pub use cover::{
    find_sidecar_cover, CoverConfig, CoverError, CoverImage, CoverNormalizer, CoverOrigin,
    ImageKind, NormalizedCover,
};
pub use job::{
    CoverChange, ErrorKind, FileJob, FileOperation, FileProcessor, JobChanges, JobError,
    JobFailure, JobId, JobOutcome, JobResult, SkipReason,
};
pub use metadata::{
    AdapterRegistry, AudioFile, ContainerFormat, FlacAdapter, GenericAdapter, MetadataAdapter,
    MetadataError, Mp3Adapter, Mp4Adapter, OggAdapter, TagPatch, TagSnapshot,
};
pub use pool::{JobExecutor, PoolStatus, StopSignal, WorkerPool};
pub use rename::{
    apply_file_plan, apply_folder_plan, sanitize_component, strip_track_prefix, RenameConfig,
    RenameError, RenamePlan, RenamePlanner,
};
