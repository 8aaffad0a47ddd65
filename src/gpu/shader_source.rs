/// The compute program is parameterized on exactly one value owned by this
/// core: the workgroup size. The placeholder is substituted before module
/// creation so the WGSL constant always agrees with the dispatch math.
pub(super) fn build_compute_wgsl(workgroup_size: u32) -> String {
    COMPUTE_WGSL_TEMPLATE.replace("__WORKGROUP_SIZE__", &workgroup_size.to_string())
}

pub(super) fn render_wgsl() -> &'static str {
    RENDER_WGSL
}

const COMPUTE_WGSL_TEMPLATE: &str = include_str!("../shaders/compute.wgsl");
const RENDER_WGSL: &str = include_str!("../shaders/draw.wgsl");
