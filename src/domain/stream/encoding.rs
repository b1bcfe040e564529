//! Output audio encoding parameters

/// Fixed encoding applied to every recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEncoding {
    /// ffmpeg encoder name (e.g. `libmp3lame`)
    pub codec: String,
    /// ffmpeg bitrate string (e.g. `128k`)
    pub bitrate: String,
    pub sample_rate: u32,
    pub channels: u8,
}

impl AudioEncoding {
    /// File extension matching the codec
    pub fn extension(&self) -> &'static str {
        match self.codec.as_str() {
            "libmp3lame" | "mp3" => "mp3",
            "aac" | "libfdk_aac" => "m4a",
            "libopus" | "opus" => "ogg",
            "libvorbis" | "vorbis" => "ogg",
            "flac" => "flac",
            _ => "mka",
        }
    }
}

impl Default for AudioEncoding {
    fn default() -> Self {
        Self {
            codec: "libmp3lame".to_string(),
            bitrate: "128k".to_string(),
            sample_rate: 44_100,
            channels: 2,
        }
    }
}
