// Supply steps, numbered in execution order.

#[path = "01_python.rs"]
pub mod python;
#[path = "02_pip.rs"]
pub mod pip;
#[path = "03_pip_pop.rs"]
pub mod pip_pop;
#[path = "04_native_libs.rs"]
pub mod native_libs;
#[path = "05_requirements.rs"]
pub mod requirements;
#[path = "06_shebangs.rs"]
pub mod shebangs;
#[path = "07_environment.rs"]
pub mod environment;
