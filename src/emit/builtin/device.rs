use crate::emit::DeviceEmitter;
use crate::target::{Target, TargetArchitecture};

/// Device constructors of the standard runtime library.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDevice;

impl DeviceEmitter for StandardDevice {
    fn construct_device(&self, target: &Target) -> String {
        let threads = target.thread_count;
        let constructor = match target.architecture {
            TargetArchitecture::Generic => "make_cpu_default_device()".to_string(),
            TargetArchitecture::Sse42 => format!("make_sse42_device({threads})"),
            TargetArchitecture::Avx => format!("make_avx_device({threads})"),
            TargetArchitecture::Avx2 => format!("make_avx2_device({threads})"),
            TargetArchitecture::Avx512 => format!("make_avx512_device({threads})"),
            TargetArchitecture::Asimd => format!("make_asimd_device({threads})"),
            TargetArchitecture::Nvidia => format!("make_nvvm_device({}, true)", target.device),
            TargetArchitecture::Amd => format!("make_amdgpu_device({}, true)", target.device),
        };
        format!("let device = {constructor};")
    }

    fn generate_database(&self) -> String {
        "  let dtb = device.load_scene_database();\n  let scene_info = device.load_scene_info();".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_devices() {
        let d = StandardDevice;
        assert_eq!(
            d.construct_device(&Target::default()),
            "let device = make_cpu_default_device();"
        );

        let mut avx2 = Target::pick_cpu(TargetArchitecture::Avx2);
        avx2.thread_count = 8;
        assert_eq!(d.construct_device(&avx2), "let device = make_avx2_device(8);");
    }

    #[test]
    fn test_gpu_devices() {
        let d = StandardDevice;
        assert_eq!(
            d.construct_device(&Target::pick_gpu(TargetArchitecture::Nvidia, 1)),
            "let device = make_nvvm_device(1, true);"
        );
        assert_eq!(
            d.construct_device(&Target::pick_gpu(TargetArchitecture::Amd, 0)),
            "let device = make_amdgpu_device(0, true);"
        );
    }

    #[test]
    fn test_database_binds_dtb() {
        let db = StandardDevice.generate_database();
        assert!(db.starts_with("  let dtb = device.load_scene_database();"));
        assert!(!db.ends_with('\n'));
    }
}
