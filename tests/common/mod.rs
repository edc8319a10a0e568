//! Shared fixtures: a small .NET solution on disk
//!
//! Layout written by [`solution`]:
//! - `Api/`     SDK project, Serilog 2.8.0
//! - `Legacy/`  packages.config project referencing `Modern`
//! - `Modern/`  SDK project, Newtonsoft.Json 12.0.3 and Serilog 2.10.0
//! - `Old/`     legacy project without packages.config
//! - `packages/` restored archives for two of Legacy's packages

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const LEGACY_PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <ProjectReference Include="..\Modern\Modern.csproj">
      <Name>Modern</Name>
    </ProjectReference>
  </ItemGroup>
</Project>"#;

pub const SDK_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net472</TargetFramework>
  </PropertyGroup>
</Project>"#;

pub const PACKAGES_CONFIG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Newtonsoft.Json" version="9.0.1" targetFramework="net472" />
  <package id="Logging.Core" version="1.2.0" targetFramework="net472" />
  <package id="Missing.Pkg" version="1.0.0" targetFramework="net472" />
  <package id="Bad" version="1.x" targetFramework="net472" />
</packages>"#;

pub const LOGGING_CORE_NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>Logging.Core</id>
    <version>1.2.0</version>
    <dependencies>
      <group targetFramework=".NETFramework4.5">
        <dependency id="Newtonsoft.Json" version="[10.0.1, )" />
      </group>
      <group targetFramework=".NETStandard2.0">
        <dependency id="Newtonsoft.Json" version="11.0.1" />
      </group>
    </dependencies>
  </metadata>
</package>"#;

pub const NEWTONSOFT_NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package>
  <metadata>
    <id>Newtonsoft.Json</id>
    <version>9.0.1</version>
  </metadata>
</package>"#;

/// Write `content` to `root/relative`, creating parent directories
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// project.assets.json with one `.NETFramework,Version=v4.7.2` target
pub fn assets_json(libraries: &[(&str, &str)]) -> String {
    let entries: Vec<String> = libraries
        .iter()
        .map(|(name, version)| format!(r#""{name}/{version}": {{ "type": "package" }}"#))
        .collect();
    format!(
        r#"{{
  "version": 3,
  "targets": {{
    ".NETFramework,Version=v4.7.2": {{ {} }}
  }},
  "libraries": {{}}
}}"#,
        entries.join(", ")
    )
}

/// Write `packages/{id}.{version}/{id}.{version}.nupkg` holding `{id}.nuspec`
pub fn write_package(root: &Path, id: &str, version: &str, nuspec: &str) {
    let dir = root.join("packages").join(format!("{id}.{version}"));
    fs::create_dir_all(&dir).unwrap();
    let file = File::create(dir.join(format!("{id}.{version}.nupkg"))).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file(format!("{id}.nuspec"), SimpleFileOptions::default())
        .unwrap();
    zip.write_all(nuspec.as_bytes()).unwrap();
    zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<Types />").unwrap();
    zip.finish().unwrap();
}

/// Build the sample solution described in the module docs
pub fn solution() -> TempDir {
    let temp = tempfile::tempdir().expect("Failed to create temp directory");
    let root = temp.path();

    write(root, "Api/Api.csproj", SDK_PROJECT);
    write(
        root,
        "Api/obj/project.assets.json",
        &assets_json(&[("Serilog", "2.8.0")]),
    );

    write(root, "Legacy/Legacy.csproj", LEGACY_PROJECT);
    write(root, "Legacy/packages.config", PACKAGES_CONFIG);
    write_package(root, "Logging.Core", "1.2.0", LOGGING_CORE_NUSPEC);
    write_package(root, "Newtonsoft.Json", "9.0.1", NEWTONSOFT_NUSPEC);

    write(root, "Modern/Modern.csproj", SDK_PROJECT);
    write(
        root,
        "Modern/obj/project.assets.json",
        &assets_json(&[("Newtonsoft.Json", "12.0.3"), ("Serilog", "2.10.0")]),
    );

    write(
        root,
        "Old/Old.csproj",
        r#"<Project ToolsVersion="4.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003" />"#,
    );

    temp
}
