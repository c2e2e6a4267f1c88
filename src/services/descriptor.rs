// ============================================================================
// 描述文件生成：project.properties、Screen1.scm、Screen1.bky
// 纯字符串构造，不做任何 IO，方便单元测试
// ============================================================================

use serde::Serialize;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::models::dtos::GenerationRequest;
use crate::services::screen_plan::{ComponentKind, HandlerKind, ScreenPlan};
use crate::services::SOUND_FILE_NAME;
use crate::utils::error::{AppError, AppResult};

/// 扩展组件包名前缀
const EXTENSION_PACKAGE_PREFIX: &str = "com.appybuilder.";

/// Google 自定义搜索接口地址
const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1?key=";

/// App Inventor 的 YaVersion / 语言版本
const YA_VERSION: &str = "232";
const LANGUAGE_VERSION: &str = "31";

/// Screen1.scm 中的一个组件
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ComponentDescriptor {
    #[serde(rename = "$Name")]
    pub name: String,
    #[serde(rename = "$Type")]
    pub component_type: String,
    #[serde(rename = "$Version")]
    pub version: String,
    #[serde(rename = "Uuid")]
    pub uuid: String,
    /// 类型相关属性（文本、颜色、尺寸、资源文件等），保持插入顺序
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

// ============================================================================
// project.properties
// ============================================================================

/// 生成 project.properties 文本
///
/// `extension_stems` 为扩展文件名去掉扩展名后的部分，按复制顺序排列。
/// 没有扩展时 `external_comps=` 的值为空字符串。
pub fn render_project_properties(
    request: &GenerationRequest,
    extension_stems: &[String],
    generated_at: OffsetDateTime,
) -> AppResult<String> {
    let timestamp = format_timestamp(generated_at)?;
    let external_comps = extension_stems
        .iter()
        .map(|stem| format!("{EXTENSION_PACKAGE_PREFIX}{stem}"))
        .collect::<Vec<_>>()
        .join(",");

    let project = &request.project_name;
    let user = &request.user_id;

    Ok(format!(
        "#
#{timestamp}
sizing=Responsive
color.primary.dark=&HFF303F9F
color.primary=&HFF3F51B5
color.accent=&HFFFF4081
aname={project}
defaultfilescope=App
main=appinventor.ai_{user}.{project}.Screen1
source=../src
actionbar=True
useslocation=False
assets=../assets
build=../build
name={project}
showlistsasjson=True
theme=AppTheme.Light.DarkActionBar
versioncode=1
versionname=1.0
external_comps={external_comps}
"
    ))
}

/// 格式化为 `Thu Jan 01 00:00:00 UTC 1970` 形式的 UTC 时间
fn format_timestamp(at: OffsetDateTime) -> AppResult<String> {
    let format = format_description!(
        "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] UTC [year]"
    );
    at.to_offset(time::UtcOffset::UTC)
        .format(&format)
        .map_err(|e| AppError::BuildError(format!("无法格式化时间戳: {}", e)))
}

// ============================================================================
// Screen1.scm
// ============================================================================

/// 根据项目名称和组件名称生成确定性的组件 Uuid（有符号 32 位整数的十进制形式）
pub fn component_uuid(project_name: &str, component_name: &str) -> String {
    let digest = Sha256::digest(format!("{project_name}/{component_name}").as_bytes());
    let bytes = [digest[0], digest[1], digest[2], digest[3]];
    i32::from_be_bytes(bytes).to_string()
}

/// 构造单个组件的描述
pub fn describe_component(kind: ComponentKind, request: &GenerationRequest) -> ComponentDescriptor {
    let properties = match kind {
        ComponentKind::SearchBox => json!({
            "Hint": "Enter search query",
            "Text": request.search_prompt,
            "Width": "Fill",
        }),
        ComponentKind::SearchButton => json!({
            "Text": "Search",
            "BackgroundColor": "&HFF4CAF50",
            "TextColor": "&HFFFFFFFF",
            "Width": "Fill",
        }),
        ComponentKind::Web => json!({}),
        ComponentKind::ResultList => json!({
            "Width": "Fill",
            "Height": "WrapContent",
        }),
        ComponentKind::ResultLabel => json!({
            "Text": "Search results will appear here",
            "FontSize": "16sp",
            "TextAlignment": "center",
            "Width": "Fill",
            "Height": "WrapContent",
        }),
        ComponentKind::SoundButton => json!({
            "Text": "Play Sound",
            "BackgroundColor": "&HFFF44336",
            "TextColor": "&HFFFFFFFF",
            "Width": "Fill",
        }),
        ComponentKind::Sound => json!({
            "Source": SOUND_FILE_NAME,
        }),
    };

    let properties = match properties {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    ComponentDescriptor {
        name: kind.component_name().to_string(),
        component_type: kind.component_type().to_string(),
        version: kind.version().to_string(),
        uuid: component_uuid(&request.project_name, kind.component_name()),
        properties,
    }
}

/// 生成 Screen1.scm 文本：`#|\n$JSON\n<json>\n|#`
///
/// JSON 部分通过 serde_json 序列化，用户输入中的引号等字符会被正确转义。
pub fn render_screen_scm(request: &GenerationRequest, plan: &ScreenPlan) -> AppResult<String> {
    let components: Vec<ComponentDescriptor> = plan
        .components
        .iter()
        .map(|kind| describe_component(*kind, request))
        .collect();

    let screen = json!({
        "authURL": ["ai2.appinventor.mit.edu"],
        "YaVersion": YA_VERSION,
        "Source": "Form",
        "Properties": {
            "$Name": "Screen1",
            "$Type": "Form",
            "$Version": LANGUAGE_VERSION,
            "ActionBar": true,
            "AppName": request.project_name,
            "Title": format!("{} Search", request.project_name),
            "Uuid": "0",
            "$Components": components,
        }
    });

    let body = serde_json::to_string_pretty(&screen)
        .map_err(|e| AppError::BuildError(format!("无法序列化 Screen1.scm: {}", e)))?;

    Ok(format!("#|\n$JSON\n{}\n|#", body))
}

// ============================================================================
// Screen1.bky
// ============================================================================

/// 生成 Screen1.bky（Blockly XML）文本
pub fn render_screen_bky(request: &GenerationRequest, plan: &ScreenPlan) -> String {
    let blocks: String = plan
        .handlers
        .iter()
        .map(|handler| match handler {
            HandlerKind::SearchClick => search_click_block(request),
            HandlerKind::GotTextList => got_text_block(&list_result_statement()),
            HandlerKind::GotTextLabel => got_text_block(&label_result_statement()),
            HandlerKind::SoundClick => sound_click_block(),
        })
        .collect();

    format!(
        r#"<xml xmlns="http://www.w3.org/1999/xhtml">
  <yacodeblocks ya-version="{YA_VERSION}" language-version="{LANGUAGE_VERSION}">
{blocks}  </yacodeblocks>
</xml>"#
    )
}

/// 转义 XML 文本节点中的特殊字符
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// SearchButton.Click：Web1.Url = endpoint + api_key + "&cx=<cse>&q=" + SearchBox.Text，然后 Web1.Get
fn search_click_block(request: &GenerationRequest) -> String {
    let endpoint = escape_xml(SEARCH_ENDPOINT);
    let api_key = escape_xml(&request.api_key);
    let query_separator = escape_xml(&format!("&cx={}&q=", request.search_engine_id));

    format!(
        r#"    <block type="component_event" x="50" y="50">
      <mutation component_type="Button" event_name="Click" component_id="SearchButton"></mutation>
      <field name="component_id">SearchButton</field>
      <field name="event_name">Click</field>
      <statement name="DO">
        <block type="component_set_get_property">
          <mutation component_type="Web" set_or_get="set" property_name="Url" is_generic="false" instance_name="Web1"></mutation>
          <field name="COMPONENT_SELECTOR">Web1</field>
          <field name="PROP">Url</field>
          <value name="VALUE">
            <block type="text_join">
              <mutation items="4"></mutation>
              <value name="ADD0">
                <block type="text">
                  <field name="TEXT">{endpoint}</field>
                </block>
              </value>
              <value name="ADD1">
                <block type="text">
                  <field name="TEXT">{api_key}</field>
                </block>
              </value>
              <value name="ADD2">
                <block type="text">
                  <field name="TEXT">{query_separator}</field>
                </block>
              </value>
              <value name="ADD3">
                <block type="component_set_get_property">
                  <mutation component_type="TextBox" set_or_get="get" property_name="Text" is_generic="false" instance_name="SearchBox"></mutation>
                  <field name="COMPONENT_SELECTOR">SearchBox</field>
                  <field name="PROP">Text</field>
                </block>
              </value>
            </block>
          </value>
          <next>
            <block type="component_method">
              <mutation component_type="Web" method_name="Get" is_generic="false" instance_name="Web1"></mutation>
              <field name="COMPONENT_SELECTOR">Web1</field>
            </block>
          </next>
        </block>
      </statement>
    </block>
"#
    )
}

/// Web1.GotText：仅当 responseCode = 200 时执行 `statement`
fn got_text_block(statement: &str) -> String {
    format!(
        r#"    <block type="component_event" x="50" y="300">
      <mutation component_type="Web" event_name="GotText" component_id="Web1"></mutation>
      <field name="component_id">Web1</field>
      <field name="event_name">GotText</field>
      <statement name="DO">
        <block type="controls_if">
          <value name="IF0">
            <block type="logic_compare">
              <field name="OP">EQ</field>
              <value name="A">
                <block type="lexical_variable_get">
                  <field name="VAR">responseCode</field>
                </block>
              </value>
              <value name="B">
                <block type="math_number">
                  <field name="NUM">200</field>
                </block>
              </value>
            </block>
          </value>
          <statement name="DO0">
{statement}          </statement>
        </block>
      </statement>
    </block>
"#
    )
}

/// 解析 responseContent 为字典的公共片段
const DECODE_RESPONSE: &str = r#"<block type="web_jsontextdecode">
                      <value name="TEXT">
                        <block type="lexical_variable_get">
                          <field name="VAR">responseContent</field>
                        </block>
                      </value>
                    </block>"#;

/// ResultListView.Elements = [item.title for item in decode(responseContent).items]
fn list_result_statement() -> String {
    format!(
        r#"            <block type="component_set_get_property">
              <mutation component_type="ListView" set_or_get="set" property_name="Elements" is_generic="false" instance_name="ResultListView"></mutation>
              <field name="COMPONENT_SELECTOR">ResultListView</field>
              <field name="PROP">Elements</field>
              <value name="VALUE">
                <block type="lists_map">
                  <field name="VAR">item</field>
                  <value name="LIST">
                    <block type="dictionaries_lookup">
                      <value name="KEY">
                        <block type="text">
                          <field name="TEXT">items</field>
                        </block>
                      </value>
                      <value name="DICT">
                    {DECODE_RESPONSE}
                      </value>
                    </block>
                  </value>
                  <value name="TO">
                    <block type="dictionaries_lookup">
                      <value name="KEY">
                        <block type="text">
                          <field name="TEXT">title</field>
                        </block>
                      </value>
                      <value name="DICT">
                        <block type="lexical_variable_get">
                          <field name="VAR">item</field>
                        </block>
                      </value>
                    </block>
                  </value>
                </block>
              </value>
            </block>
"#
    )
}

/// ResultLabel.Text = decode(responseContent).title
fn label_result_statement() -> String {
    format!(
        r#"            <block type="component_set_get_property">
              <mutation component_type="Label" set_or_get="set" property_name="Text" is_generic="false" instance_name="ResultLabel"></mutation>
              <field name="COMPONENT_SELECTOR">ResultLabel</field>
              <field name="PROP">Text</field>
              <value name="VALUE">
                <block type="dictionaries_lookup">
                  <value name="KEY">
                    <block type="text">
                      <field name="TEXT">title</field>
                    </block>
                  </value>
                  <value name="DICT">
                    {DECODE_RESPONSE}
                  </value>
                </block>
              </value>
            </block>
"#
    )
}

/// SoundButton.Click：Sound1.Play
fn sound_click_block() -> String {
    r#"    <block type="component_event" x="50" y="600">
      <mutation component_type="Button" event_name="Click" component_id="SoundButton"></mutation>
      <field name="component_id">SoundButton</field>
      <field name="event_name">Click</field>
      <statement name="DO">
        <block type="component_method">
          <mutation component_type="Sound" method_name="Play" is_generic="false" instance_name="Sound1"></mutation>
          <field name="COMPONENT_SELECTOR">Sound1</field>
        </block>
      </statement>
    </block>
"#
    .to_string()
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dtos::FeatureFlags;
    use std::path::PathBuf;
    use time::macros::datetime;

    fn weather_request() -> GenerationRequest {
        GenerationRequest {
            project_name: "AIWeather".to_string(),
            user_id: "dev42".to_string(),
            api_key: "KEY".to_string(),
            search_engine_id: "CSE1".to_string(),
            search_prompt: "weather today".to_string(),
            requirements_text: String::new(),
            extension_paths: vec![],
            output_path: PathBuf::from("AIWeather.aia"),
        }
    }

    fn plan(use_list_view: bool, play_sound: bool) -> ScreenPlan {
        ScreenPlan::for_features(FeatureFlags {
            use_list_view,
            play_sound,
        })
    }

    fn parse_scm(scm: &str) -> Value {
        let body = scm
            .strip_prefix("#|\n$JSON\n")
            .and_then(|s| s.strip_suffix("\n|#"))
            .expect("scm wrapper");
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_properties_without_extensions() {
        let props =
            render_project_properties(&weather_request(), &[], datetime!(2024-03-07 09:05:01 UTC))
                .unwrap();
        assert!(props.starts_with("#\n#Thu Mar 07 09:05:01 UTC 2024\n"));
        assert!(props.contains("\nmain=appinventor.ai_dev42.AIWeather.Screen1\n"));
        assert!(props.contains("\naname=AIWeather\n"));
        assert!(props.contains("\nname=AIWeather\n"));
        assert!(props.ends_with("\nexternal_comps=\n"));
    }

    #[test]
    fn test_properties_with_extensions() {
        let stems = vec!["Foo".to_string(), "BarTools".to_string()];
        let props =
            render_project_properties(&weather_request(), &stems, datetime!(2024-01-01 00:00:00 UTC))
                .unwrap();
        assert!(props.contains("\nexternal_comps=com.appybuilder.Foo,com.appybuilder.BarTools\n"));
    }

    #[test]
    fn test_timestamp_is_converted_to_utc() {
        let at = datetime!(2024-01-01 08:00:00 +08:00);
        assert_eq!(format_timestamp(at).unwrap(), "Mon Jan 01 00:00:00 UTC 2024");
    }

    #[test]
    fn test_scm_label_variant() {
        let scm = render_screen_scm(&weather_request(), &plan(false, false)).unwrap();
        let value = parse_scm(&scm);
        let props = &value["Properties"];
        assert_eq!(props["AppName"], "AIWeather");
        assert_eq!(props["Title"], "AIWeather Search");

        let names: Vec<&str> = props["$Components"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["$Name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["SearchBox", "SearchButton", "Web1", "ResultLabel"]);
        assert_eq!(props["$Components"][0]["Text"], "weather today");
    }

    #[test]
    fn test_scm_list_and_sound_variant() {
        let scm = render_screen_scm(&weather_request(), &plan(true, true)).unwrap();
        let value = parse_scm(&scm);
        let components = value["Properties"]["$Components"].as_array().unwrap();
        let types: Vec<&str> = components
            .iter()
            .map(|c| c["$Type"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["TextBox", "Button", "Web", "ListView", "Button", "Sound"]);
        assert_eq!(components[5]["Source"], SOUND_FILE_NAME);
    }

    #[test]
    fn test_scm_escapes_quotes_in_prompt() {
        let mut request = weather_request();
        request.search_prompt = r#"say "hi" \ bye"#.to_string();
        let scm = render_screen_scm(&request, &plan(false, false)).unwrap();
        let value = parse_scm(&scm);
        assert_eq!(value["Properties"]["$Components"][0]["Text"], r#"say "hi" \ bye"#);
    }

    #[test]
    fn test_component_uuids_are_stable_and_unique() {
        let request = weather_request();
        let a = describe_component(ComponentKind::SearchBox, &request);
        let b = describe_component(ComponentKind::SearchBox, &request);
        assert_eq!(a.uuid, b.uuid);
        assert!(a.uuid.parse::<i32>().is_ok());

        let p = plan(true, true);
        let mut uuids: Vec<String> = p
            .components
            .iter()
            .map(|k| describe_component(*k, &request).uuid)
            .collect();
        uuids.sort();
        uuids.dedup();
        assert_eq!(uuids.len(), p.components.len());
    }

    #[test]
    fn test_bky_url_join() {
        let bky = render_screen_bky(&weather_request(), &plan(false, false));
        assert!(bky.starts_with(r#"<xml xmlns="http://www.w3.org/1999/xhtml">"#));
        assert!(bky.contains(
            "<field name=\"TEXT\">https://www.googleapis.com/customsearch/v1?key=</field>"
        ));
        assert!(bky.contains("<field name=\"TEXT\">KEY</field>"));
        assert!(bky.contains("<field name=\"TEXT\">&amp;cx=CSE1&amp;q=</field>"));
        assert!(bky.contains("instance_name=\"SearchBox\""));
        assert!(bky.contains("<field name=\"NUM\">200</field>"));
    }

    #[test]
    fn test_bky_label_variant_has_no_list_or_sound() {
        let bky = render_screen_bky(&weather_request(), &plan(false, false));
        assert!(bky.contains("instance_name=\"ResultLabel\""));
        assert!(!bky.contains("ResultListView"));
        assert!(!bky.contains("SoundButton"));
        assert_eq!(bky.matches("type=\"component_event\"").count(), 2);
    }

    #[test]
    fn test_bky_list_variant_maps_items_to_titles() {
        let bky = render_screen_bky(&weather_request(), &plan(true, false));
        assert!(bky.contains("instance_name=\"ResultListView\""));
        assert!(bky.contains("<field name=\"TEXT\">items</field>"));
        assert!(bky.contains("<field name=\"TEXT\">title</field>"));
        assert!(!bky.contains("instance_name=\"ResultLabel\""));
    }

    #[test]
    fn test_bky_sound_handler() {
        let bky = render_screen_bky(&weather_request(), &plan(false, true));
        assert!(bky.contains("component_id=\"SoundButton\""));
        assert!(bky.contains("method_name=\"Play\""));
        assert_eq!(bky.matches("type=\"component_event\"").count(), 3);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
