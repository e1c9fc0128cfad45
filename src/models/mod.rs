pub mod answer;
pub mod answer_set;
pub mod exam;
pub mod graded;
pub mod loaders;
pub mod sheet;

pub use answer::{Answer, Selection, INVALID_MARK, STANDARD_OPTIONS};
pub use answer_set::AnswerSet;
pub use exam::{ExamData, RawAnswer, ScanMode};
pub use graded::{ExamKey, GradedResult, PASSING_SCORE};
pub use loaders::{load_all_sheet_images, load_key_from_toml, load_sheet_image, save_key_to_toml};
pub use sheet::SheetImage;
