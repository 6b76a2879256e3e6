// Trade collage rendering: concurrent card image fetch, composition onto the
// planned layout, PNG encoding. Geometry lives in `layout`.

pub mod compose;
pub mod fetch;
pub mod handlers;
