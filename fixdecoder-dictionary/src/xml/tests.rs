use assert_matches::assert_matches;
use quick_xml::de::from_str;

use super::*;

#[test]
fn parse_field_types() {
    #[rustfmt::skip]
    let type_pairs = [
        ("<field name='A' number='1' type='AMT'/>", FieldType::Amt),
        ("<field name='A' number='1' type='BOOLEAN'/>", FieldType::Boolean),
        ("<field name='A' number='1' type='CHAR'/>", FieldType::Char),
        ("<field name='A' number='1' type='INT'/>", FieldType::Int),
        ("<field name='A' number='1' type='LONG'/>", FieldType::Int),
        ("<field name='A' number='1' type='int'/>", FieldType::Int),
        ("<field name='A' number='1' type='Qty'/>", FieldType::Qty),
        ("<field name='A' number='1' type='QUANTITY'/>", FieldType::Qty),
        ("<field name='A' number='1' type='MONTHYEAR'/>", FieldType::MonthYear),
        ("<field name='A' number='1' type='MULTIPLEVALUESTRING'/>", FieldType::MultipleValueString),
        ("<field name='A' number='1' type='NUMINGROUP'/>", FieldType::NumInGroup),
        ("<field name='A' number='1' type='UTCDATE'/>", FieldType::UtcDateOnly),
        ("<field name='A' number='1' type='UTCTIMESTAMP'/>", FieldType::UtcTimestamp),
    ];

    for (xml, expected_type) in type_pairs {
        let field: Field = from_str(xml).unwrap_or_else(|_| panic!("Failed to parse: {xml}"));
        assert_eq!(field.data_type(), Some(expected_type), "Type mismatch for: {xml}");
    }
}

#[test]
fn type_aliases_keep_their_spelling() {
    let field: Field = from_str("<field name='A' number='34' type='LONG'/>").unwrap();
    assert_eq!(field.type_name.as_deref(), Some("LONG"));
    assert_eq!(field.data_type(), Some(FieldType::Int));
}

#[test]
fn unknown_field_type_is_kept_verbatim() {
    let field: Field = from_str("<field name='A' number='1' type='CustomKind'/>").unwrap();
    assert_eq!(field.data_type(), Some(FieldType::Other("CustomKind".into())));
    assert_eq!(field.data_type().unwrap().to_string(), "CustomKind");
}

#[test]
fn field_without_type() {
    let field: Field = from_str("<field name='A' number='7'/>").unwrap();
    assert_eq!(field.number, 7);
    assert_eq!(field.type_name, None);
    assert_eq!(field.data_type(), None);
}

#[test]
fn field_with_non_numeric_number_is_rejected() {
    assert_matches!(from_str::<Field>("<field name='A' number='x' type='INT'/>"), Err(_));
    assert_matches!(from_str::<Field>("<field name='A' number='-1' type='INT'/>"), Err(_));
}

#[test]
fn enum_values_in_both_shapes() {
    let xml = r#"
        <field number="54" name="Side" type="CHAR">
            <value enum="1" description="BUY"/>
            <value enum="2" description="SELL"/>
            <values>
                <value enum="3" description="BUY_MINUS"/>
                <value enum="1" description="DUPLICATE"/>
            </values>
        </field>"#;
    let field: Field = from_str(xml).unwrap();

    let values: Vec<(&str, &str)> = field
        .all_values()
        .map(|v| (v.value_enum.as_str(), v.description.as_str()))
        .collect();
    assert_eq!(
        values,
        [
            ("1", "BUY"),
            ("2", "SELL"),
            ("3", "BUY_MINUS"),
            ("1", "DUPLICATE")
        ]
    );
}

#[test]
fn required_flag() {
    let member: MemberRef = from_str("<field name='A' required='Y'/>").unwrap();
    assert!(member.required);
    let member: MemberRef = from_str("<field name='A' required='N'/>").unwrap();
    assert!(!member.required);
    let member: MemberRef = from_str("<field name='A'/>").unwrap();
    assert!(!member.required);
    assert_matches!(from_str::<MemberRef>("<field name='A' required='maybe'/>"), Err(_));
}

#[test]
fn message_members_keep_declaration_order() {
    let xml = r#"
        <message name="NewOrderSingle" msgtype="D" msgcat="app">
            <field name="ClOrdID" required="Y"/>
            <component name="Parties" required="N"/>
            <group name="NoAllocs" required="N">
                <field name="AllocAccount" required="N"/>
            </group>
            <field name="Side" required="Y"/>
        </message>"#;
    let message: Message = from_str(xml).unwrap();

    assert_eq!(message.msg_type, "D");
    assert_eq!(message.msg_cat, "app");
    let names: Vec<&str> = message.members.iter().map(Member::name).collect();
    assert_eq!(names, ["ClOrdID", "Parties", "NoAllocs", "Side"]);
    assert_matches!(&message.members[1], Member::Component(MemberRef { required: false, .. }));
    assert_matches!(&message.members[2], Member::Group(group) if group.members.len() == 1);
}

#[test]
fn parse_dictionary_document() {
    let xml = r#"
        <fix type="FIX" major="4" minor="4" servicepack="0">
            <header>
                <field name="BeginString" required="Y"/>
            </header>
            <trailer/>
            <messages>
                <message name="Heartbeat" msgtype="0" msgcat="admin"/>
            </messages>
            <components/>
            <fields>
                <field number="8" name="BeginString" type="STRING"/>
            </fields>
        </fix>"#;
    let dictionary = RawDictionary::parse(xml).unwrap();

    assert_eq!(dictionary.fix_type, Some(FixType::Fix));
    assert_eq!(dictionary.major, "4");
    assert_eq!(dictionary.minor, "4");
    assert_eq!(dictionary.servicepack.as_deref(), Some("0"));
    assert_eq!(dictionary.header.members.len(), 1);
    assert!(dictionary.trailer.members.is_empty());
    assert_eq!(dictionary.messages.len(), 1);
    assert!(dictionary.components.is_empty());
    assert!(dictionary.groups.is_empty());
    assert_eq!(dictionary.fields.len(), 1);
}

#[test]
fn parse_top_level_groups_section() {
    let xml = r#"
        <fix major="4" minor="2">
            <groups>
                <group name="NoHops">
                    <field name="HopCompID"/>
                </group>
            </groups>
        </fix>"#;
    let dictionary = RawDictionary::parse(xml).unwrap();

    assert_eq!(dictionary.fix_type, None);
    assert_eq!(dictionary.servicepack, None);
    assert_eq!(dictionary.groups.len(), 1);
    assert_eq!(dictionary.groups[0].name, "NoHops");
}

#[test]
fn malformed_document_is_an_error() {
    assert_matches!(
        RawDictionary::parse("<fix major='4' minor='4'><fields>"),
        Err(Error::XmlParse(_))
    );
}
