/// Use mimalloc as the global allocator for all binaries.
/// 2-3x faster than glibc malloc for small allocations, which dominate
/// here: token buffers, hash vectors and path tables.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod comp;
pub mod index;
pub mod lexer;
pub mod map;
pub mod sig;
