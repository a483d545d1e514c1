pub mod books;

use bookrate_db::Pool;
use bookrate_kernel::ModuleRegistry;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &Pool) {
    registry.register(books::create_module(pool.clone()));
}
