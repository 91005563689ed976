/// Three space-separated components at one-decimal precision, the form the
/// maxfilter command line takes for a sphere origin.
pub fn format_origin(origin: [f32; 3]) -> String {
    format!("{:.1} {:.1} {:.1}", origin[0], origin[1], origin[2])
}
